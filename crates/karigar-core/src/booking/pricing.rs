//! Derived pricing for bookings.
//!
//! The platform fee and the displayed total are each rounded independently
//! from the base price. They are NOT derived from one another: `total` is
//! `round(price * 1.10)`, not `price + fee`, and the two can drift by a
//! rupee for some inputs. Every surface (invoice, in-app summary) must use
//! this one pair of formulas.

use serde::{Deserialize, Serialize};

const PLATFORM_FEE_RATE: f64 = 0.10;

/// Platform fee in whole rupees: `round(price * 0.10)`.
pub fn platform_fee(base_price: i64) -> i64 {
    (base_price as f64 * PLATFORM_FEE_RATE).round() as i64
}

/// Customer-facing total in whole rupees: `round(price * 1.10)`.
pub fn invoice_total(base_price: i64) -> i64 {
    (base_price as f64 * (1.0 + PLATFORM_FEE_RATE)).round() as i64
}

/// Provider's net payout after the platform fee.
pub fn net_payout(base_price: i64) -> i64 {
    base_price - platform_fee(base_price)
}

/// The priced breakdown of a booking, shared by the invoice and the in-app
/// summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub base_price: i64,
    pub platform_fee: i64,
    pub total: i64,
}

impl Quote {
    pub fn for_price(base_price: i64) -> Self {
        Self {
            base_price,
            platform_fee: platform_fee(base_price),
            total: invoice_total(base_price),
        }
    }
}
