//! Shopping cart state: ordered lines, derived totals and the cart panel flag.
//!
//! Totals are always computed from the lines and the products they reference.
//! Nothing derived is stored, so a product swapped in by
//! [`CartStore::refresh_product`] is priced immediately.

use bigdecimal::{BigDecimal, Zero};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::ports::CartStorage;
use super::product::Product;

/// Fixed key of the durable cart slot.
pub const CART_STORAGE_KEY: &str = "storefront-cart";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    product: Product,
    quantity: u32,
}

impl CartLine {
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Always at least 1.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_total(&self) -> BigDecimal {
        &self.product.price * BigDecimal::from(self.quantity)
    }
}

/// Lines in first-added order, at most one per product id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Build a cart from untrusted lines (e.g. a persisted slot): zero
    /// quantities are dropped and repeated product ids are merged into the
    /// first occurrence.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::default();
        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            match cart.position(&line.product.id) {
                Some(idx) => {
                    let existing = &mut cart.lines[idx];
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn total_price(&self) -> BigDecimal {
        self.lines
            .iter()
            .fold(BigDecimal::zero(), |acc, l| acc + l.line_total())
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.product.id == product_id)
    }
}

/// What a mutation did, handed to observers together with the new cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    Added { product_id: String, quantity: u32 },
    QuantitySet { product_id: String, quantity: u32 },
    Removed { product_id: String },
    Refreshed { product_id: String },
    Cleared,
    PanelOpened,
    PanelClosed,
}

pub type CartObserver = Box<dyn Fn(&CartChange, &Cart) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Single owner of one session's cart.
///
/// Every mutation runs to completion, then writes the slot (best effort) and
/// notifies observers. Malformed input is clamped or ignored, never an error.
pub struct CartStore {
    cart: Cart,
    open: bool,
    storage: Option<Box<dyn CartStorage>>,
    observers: Vec<(SubscriptionId, CartObserver)>,
    next_subscription: u64,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("open", &self.open)
            .field("persistent", &self.storage.is_some())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Empty, closed, in-memory only.
    pub fn new() -> Self {
        Self {
            cart: Cart::default(),
            open: false,
            storage: None,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Restore from `storage` and keep writing to it after each mutation.
    /// An unreadable slot starts an empty cart.
    pub fn with_storage(storage: Box<dyn CartStorage>) -> Self {
        let cart = match storage.load() {
            Ok(Some(lines)) => Cart::from_lines(lines),
            Ok(None) => Cart::default(),
            Err(e) => {
                warn!("Ignoring unreadable cart slot: {}", e);
                Cart::default()
            }
        };
        Self {
            cart,
            storage: Some(storage),
            ..Self::new()
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    pub fn total_price(&self) -> BigDecimal {
        self.cart.total_price()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Add `quantity` of `product`; anything below 1 counts as 1.
    /// An existing line takes the given record, so its price is current.
    /// Opens the cart panel.
    pub fn add(&mut self, product: Product, quantity: i64) {
        let quantity = clamp_quantity(quantity).unwrap_or(1);
        let product_id = product.id.clone();

        match self.cart.position(&product_id) {
            Some(idx) => {
                let line = &mut self.cart.lines[idx];
                line.quantity = line.quantity.saturating_add(quantity);
                line.product = product;
            }
            None => self.cart.lines.push(CartLine { product, quantity }),
        }
        debug!("Added {} x {} to cart", quantity, product_id);
        self.commit(CartChange::Added {
            product_id,
            quantity,
        });
        self.set_open(true);
    }

    /// Replace a line's quantity. Zero or less removes the line; an unknown
    /// product id is ignored.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) {
        let Some(idx) = self.cart.position(product_id) else {
            debug!("Ignoring quantity change for {} (not in cart)", product_id);
            return;
        };
        let Some(quantity) = clamp_quantity(quantity) else {
            self.remove(product_id);
            return;
        };
        self.cart.lines[idx].quantity = quantity;
        self.commit(CartChange::QuantitySet {
            product_id: product_id.to_string(),
            quantity,
        });
    }

    pub fn remove(&mut self, product_id: &str) {
        let Some(idx) = self.cart.position(product_id) else {
            return;
        };
        self.cart.lines.remove(idx);
        debug!("Removed {} from cart", product_id);
        self.commit(CartChange::Removed {
            product_id: product_id.to_string(),
        });
    }

    pub fn clear(&mut self) {
        self.cart.lines.clear();
        self.commit(CartChange::Cleared);
    }

    /// Swap in the catalog's current record for a product already in the
    /// cart. Quantity is kept; totals follow the new price.
    pub fn refresh_product(&mut self, product: Product) {
        let Some(idx) = self.cart.position(&product.id) else {
            return;
        };
        if self.cart.lines[idx].product == product {
            return;
        }
        let product_id = product.id.clone();
        self.cart.lines[idx].product = product;
        self.commit(CartChange::Refreshed { product_id });
    }

    pub fn set_open(&mut self, open: bool) {
        if self.open == open {
            return;
        }
        self.open = open;
        let change = if open {
            CartChange::PanelOpened
        } else {
            CartChange::PanelClosed
        };
        self.notify(&change);
    }

    pub fn subscribe(&mut self, observer: CartObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.observers.retain(|(sid, _)| *sid != id);
    }

    fn commit(&mut self, change: CartChange) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save(self.cart.lines()) {
                warn!("Failed to persist cart: {}", e);
            }
        }
        self.notify(&change);
    }

    fn notify(&self, change: &CartChange) {
        for (_, observer) in &self.observers {
            observer(change, &self.cart);
        }
    }
}

/// `None` for anything below 1.
fn clamp_quantity(quantity: i64) -> Option<u32> {
    if quantity < 1 {
        None
    } else {
        Some(u32::try_from(quantity).unwrap_or(u32::MAX))
    }
}
