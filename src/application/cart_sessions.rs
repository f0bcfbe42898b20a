use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::debug;

use crate::domain::cart::CartStore;
use crate::domain::errors::DomainError;
use crate::domain::ports::CartStorage;

/// One session's cart. The async lock serialises that session's operations.
pub type SharedCart = Arc<tokio::sync::Mutex<CartStore>>;

type StorageFactory = Box<dyn Fn(&str) -> Box<dyn CartStorage> + Send + Sync>;

const MAX_SESSION_KEY_LEN: usize = 64;

pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct Entry {
    store: SharedCart,
    last_used: Instant,
}

impl Entry {
    /// A handler still holds the store.
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.store) > 1
    }

    fn is_blank(&self) -> bool {
        self.store
            .try_lock()
            .map(|store| store.lines().is_empty())
            .unwrap_or(false)
    }
}

/// Owns one [`CartStore`] per client session. Stores are created on first use
/// and never shared between sessions.
///
/// The registry holds at most `max_sessions` stores that nobody is using.
/// When it is full, empty and idle stores go first, then the least recently
/// used. A persisted cart that was dropped is restored from its slot on the
/// next open.
pub struct CartSessions {
    stores: Mutex<HashMap<String, Entry>>,
    storage: Option<StorageFactory>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl CartSessions {
    /// Carts live only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            stores: Mutex::new(HashMap::new()),
            storage: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_ttl: DEFAULT_IDLE_TTL,
        }
    }

    /// Each new store is restored from, and written back to, the slot the
    /// factory returns for its session key.
    pub fn with_storage<F>(factory: F) -> Self
    where
        F: Fn(&str) -> Box<dyn CartStorage> + Send + Sync + 'static,
    {
        Self {
            storage: Some(Box::new(factory)),
            ..Self::in_memory()
        }
    }

    pub fn with_limits(mut self, max_sessions: usize, idle_ttl: Duration) -> Self {
        self.max_sessions = max_sessions.max(1);
        self.idle_ttl = idle_ttl;
        self
    }

    pub fn open(&self, session_key: &str) -> Result<SharedCart, DomainError> {
        validate_session_key(session_key)?;
        let mut stores = self
            .stores
            .lock()
            .map_err(|_| DomainError::Internal("cart session registry poisoned".into()))?;
        let now = Instant::now();

        if let Some(entry) = stores.get_mut(session_key) {
            entry.last_used = now;
            return Ok(Arc::clone(&entry.store));
        }

        if stores.len() >= self.max_sessions {
            self.evict(&mut stores, now);
        }

        let store = match &self.storage {
            Some(factory) => CartStore::with_storage(factory(session_key)),
            None => CartStore::new(),
        };
        debug!(
            "Opened cart session {} with {} items",
            session_key,
            store.total_items()
        );
        let store = Arc::new(tokio::sync::Mutex::new(store));
        stores.insert(
            session_key.to_string(),
            Entry {
                store: Arc::clone(&store),
                last_used: now,
            },
        );
        Ok(store)
    }

    /// Number of stores currently held.
    pub fn active_sessions(&self) -> usize {
        self.stores.lock().map(|stores| stores.len()).unwrap_or(0)
    }

    /// Make room for one more store. Stores in use are never dropped, so the
    /// registry can exceed its limit while every store is busy.
    fn evict(&self, stores: &mut HashMap<String, Entry>, now: Instant) {
        let before = stores.len();
        stores.retain(|_, entry| {
            entry.in_use()
                || (now.duration_since(entry.last_used) < self.idle_ttl && !entry.is_blank())
        });

        while stores.len() >= self.max_sessions {
            let oldest = stores
                .iter()
                .filter(|(_, entry)| !entry.in_use())
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    stores.remove(&key);
                }
                None => break,
            }
        }
        debug!(
            "Evicted {} cart sessions, {} remain",
            before - stores.len(),
            stores.len()
        );
    }
}

/// Session keys double as directory names, so keep them tame.
pub fn validate_session_key(key: &str) -> Result<(), DomainError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_SESSION_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidInput(format!(
            "invalid cart session '{key}'"
        )))
    }
}
