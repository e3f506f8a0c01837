//! Core types for the cart.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod id;
pub mod line_item;
pub mod money;
pub mod product;

pub use id::ProductId;
pub use line_item::{LineItem, TagCategory};
pub use money::Money;
pub use product::{ProductInput, ProductInputError};
