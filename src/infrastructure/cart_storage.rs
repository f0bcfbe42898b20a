use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::cart::{CartLine, CART_STORAGE_KEY};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartStorage;

/// Cart slot kept as a JSON file: `<root>/<session>/storefront-cart.json`.
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `session` must already be a validated session key.
    pub fn for_session(root: &Path, session: &str) -> Self {
        Self::new(root.join(session).join(format!("{CART_STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self) -> Result<Option<Vec<CartLine>>, DomainError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&self.path, e)),
        };
        let lines = serde_json::from_slice(&raw).map_err(|e| storage_error(&self.path, e))?;
        Ok(Some(lines))
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), DomainError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| storage_error(dir, e))?;
        }
        let json = serde_json::to_vec(lines).map_err(|e| storage_error(&self.path, e))?;

        // Write-then-rename so a reader never sees half a slot.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| storage_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| storage_error(&self.path, e))?;
        Ok(())
    }
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> DomainError {
    DomainError::Internal(format!("cart slot {}: {}", path.display(), e))
}
