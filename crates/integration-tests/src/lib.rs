//! Integration tests for the wine store cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p wine-store-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - End-to-end page flows through the widget
//! - `file_storage` - Persistence across widget instances on disk
//! - `toast_timers` - Toast lifecycle on real (paused) tokio time

use rust_decimal::Decimal;
use wine_store_core::{ProductId, ProductInput};

/// A catalog product with a name and a price in cents.
#[must_use]
pub fn wine(id: i64, name: &str, cents: i64) -> ProductInput {
    ProductInput::new(ProductId::new(id))
        .with_name(name)
        .with_price(Decimal::new(cents, 2))
}

/// A pt-PT EUR string with regular spaces swapped for U+00A0.
#[must_use]
pub fn eur(text: &str) -> String {
    text.replace(' ', "\u{a0}")
}
