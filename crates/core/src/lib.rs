//! Wine Store Core - Cart domain types.
//!
//! This crate provides the types shared by the cart widget and its tooling:
//! - `storefront` - The page-scoped cart widget (storage, view, notifications)
//! - `cli` - Command-line driver for a file-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart logic - no storage access,
//! no rendering, no timers. Every operation here is deterministic so it can be
//! tested without a page or a storage backend.
//!
//! # Modules
//!
//! - [`types`] - Product ids, EUR money, product input normalisation, line items
//! - [`cart`] - The ordered, id-unique collection of line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, QtyChange};
pub use types::*;
