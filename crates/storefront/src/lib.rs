//! Wine Store Storefront - the page-scoped cart widget.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the cart, persisted in one [`storage::Storage`] slot
//! - [`view::CartView`] renders cart snapshots through a [`view::Renderer`]
//! - [`notification`] runs the "added to cart" toast lifecycle on an injected
//!   [`notification::Scheduler`]
//! - [`page::HtmlPage`] is the askama-backed HTML [`view::Renderer`]
//! - [`widget::CartWidget`] wires them together behind the calls a page makes
//!
//! Cart operations never fail: unreadable storage is an empty cart, unknown
//! ids are no-ops and missing page elements are skipped.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod notification;
pub mod page;
pub mod storage;
pub mod store;
pub mod view;
pub mod widget;

pub use config::WidgetConfig;
pub use error::WidgetError;
pub use page::HtmlPage;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{CART_KEY, CartStore};
pub use view::{CartView, Links, Renderer};
pub use widget::CartWidget;
