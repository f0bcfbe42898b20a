use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};

use super::cart::Cart;
use super::errors::DomainError;
use super::identity::AuthenticatedUser;


pub const DEFAULT_COUNTRY: &str = "United States";

/// Sales tax applied to every order, as a fraction (8%).
pub fn tax_rate() -> BigDecimal {
    BigDecimal::new(8.into(), 2)
}

/// Round a monetary amount to cents, half away from zero.
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// Subtotal, tax and grand total at full precision. Round with
/// [`CheckoutTotals::rounded`] only when presenting.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutTotals {
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub grand_total: BigDecimal,
}

impl CheckoutTotals {
    pub fn for_cart(cart: &Cart) -> Self {
        Self::from_subtotal(cart.total_price(), &tax_rate())
    }

    pub fn from_subtotal(subtotal: BigDecimal, rate: &BigDecimal) -> Self {
        let tax = &subtotal * rate;
        let grand_total = &subtotal + &tax;
        Self {
            subtotal,
            tax,
            grand_total,
        }
    }

    pub fn rounded(&self) -> CheckoutTotals {
        CheckoutTotals {
            subtotal: round_money(&self.subtotal),
            tax: round_money(&self.tax),
            grand_total: round_money(&self.grand_total),
        }
    }
}

/// Shipping details collected at checkout. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for ShippingInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl ShippingInfo {
    /// Name and email taken from the signed-in user; the rest left blank.
    pub fn prefilled_for(user: &AuthenticatedUser) -> Self {
        let (first_name, last_name) = user.split_name();
        Self {
            first_name,
            last_name,
            email: user.email.clone(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("country", &self.country),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::InvalidInput(format!(
                "missing shipping fields: {}",
                missing.join(", ")
            )));
        }
        if !self.email.contains('@') {
            return Err(DomainError::InvalidInput(format!(
                "invalid email '{}'",
                self.email
            )));
        }
        Ok(())
    }

    /// Single-line address handed to the payment session.
    pub fn address_line(&self) -> String {
        format!(
            "{}, {}, {} {}, {}",
            self.address.trim(),
            self.city.trim(),
            self.state.trim(),
            self.zip_code.trim(),
            self.country.trim()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub id: String,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: u32,
}

/// Payload for the checkout initiator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    pub shipping_address: String,
}

impl CheckoutRequest {
    pub fn new(cart: &Cart, shipping: &ShippingInfo) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|l| CheckoutItem {
                    id: l.product().id.clone(),
                    name: l.product().name.clone(),
                    price: l.product().price.clone(),
                    quantity: l.quantity(),
                })
                .collect(),
            shipping_address: shipping.address_line(),
        }
    }
}

/// A payment session opened by the checkout initiator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOutcome {
    pub redirect_url: String,
    pub totals: CheckoutTotals,
}

/// Short reference shown after payment: the last eight characters of the
/// payment session id.
pub fn order_reference(session_id: &str) -> String {
    let chars: Vec<char> = session_id.chars().collect();
    let start = chars.len().saturating_sub(8);
    chars[start..].iter().collect()
}
