//! Persisted cart state.
//!
//! `CartStore` owns the authoritative cart, kept in a single storage slot.
//! Every operation is a fresh load-mutate-save cycle; nothing about the cart
//! is cached between calls.

use tracing::instrument;

use wine_store_core::{Cart, LineItem, Money, ProductId, ProductInput, QtyChange};

use crate::storage::{Storage, StorageError};

/// Storage slot holding the serialised cart.
pub const CART_KEY: &str = "wineStoreCart";

/// Cart operations over an injected storage backend.
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    storage: S,
}

impl<S: Storage> CartStore<S> {
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Read the persisted cart.
    ///
    /// A missing slot is an empty cart. An unparseable slot is logged and
    /// also treated as empty; it is overwritten by the next mutation.
    #[must_use]
    pub fn load(&self) -> Cart {
        let Some(raw) = self.storage.get(CART_KEY) else {
            return Cart::new();
        };

        match serde_json::from_str::<Vec<LineItem>>(&raw) {
            Ok(records) => {
                let (cart, dropped) = Cart::from_records(records);
                if dropped > 0 {
                    tracing::warn!(dropped, "Dropped invalid cart records on load");
                }
                cart
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted cart is unreadable, starting empty");
                Cart::new()
            }
        }
    }

    /// Overwrite the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails or the backend rejects the write.
    pub fn try_save(&mut self, cart: &Cart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart)?;
        self.storage.set(CART_KEY, &raw)
    }

    /// Overwrite the persisted cart, logging instead of failing.
    pub fn save(&mut self, cart: &Cart) {
        if let Err(e) = self.try_save(cart) {
            tracing::warn!(error = %e, items = cart.len(), "Failed to persist cart");
        }
    }

    /// Add one unit of a product and return the resulting line item.
    ///
    /// Re-adding a known id only bumps its quantity; the name, price and
    /// other fields stay as first added.
    #[instrument(skip(self, input), fields(product_id = %input.id))]
    pub fn add(&mut self, input: ProductInput) -> LineItem {
        let mut cart = self.load();
        let item = cart.add(input.normalize()).clone();
        self.save(&cart);
        tracing::debug!(qty = item.qty, "Added to cart");
        item
    }

    /// Remove a product. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: ProductId) {
        let mut cart = self.load();
        if cart.remove(id).is_none() {
            tracing::debug!("No such item to remove");
        }
        self.save(&cart);
    }

    /// Add `delta` to a product's quantity, removing it at zero or below.
    /// Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn change_qty(&mut self, id: ProductId, delta: i64) -> QtyChange {
        let mut cart = self.load();
        let change = cart.change_qty(id, delta);
        match change {
            QtyChange::Missing => tracing::debug!("No such item to update"),
            QtyChange::Updated(_) | QtyChange::Removed => self.save(&cart),
        }
        change
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        if let Err(e) = self.storage.remove(CART_KEY) {
            tracing::warn!(error = %e, "Failed to clear cart");
        }
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<LineItem> {
        self.load().get(id).cloned()
    }

    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.load().items().to_vec()
    }

    /// Sum of quantities, shown on the badge.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.load().total_quantity()
    }

    /// Sum of `price × qty`.
    #[must_use]
    pub fn total_amount(&self) -> Money {
        self.load().total_amount()
    }
}
