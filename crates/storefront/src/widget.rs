//! Page-scoped cart widget.
//!
//! `CartWidget` is what the rest of a page talks to. Each inbound call runs
//! to completion: mutate the store, then refresh whatever the page shows.
//!
//! | Page call                  | Widget method                                  |
//! |----------------------------|------------------------------------------------|
//! | page load                  | [`init`](CartWidget::init)                     |
//! | `addToCart(product)`       | [`add_to_cart_json`](CartWidget::add_to_cart_json) |
//! | `removeFromCart(id)`       | [`remove_from_cart`](CartWidget::remove_from_cart) |
//! | `changeQty(id, delta)`     | [`change_qty`](CartWidget::change_qty)         |
//! | toast close button         | [`dismiss_notification`](CartWidget::dismiss_notification) |

use std::time::Duration;

use serde_json::Value;

use wine_store_core::{Cart, LineItem, ProductId, ProductInput, QtyChange};

use crate::notification::{ManualScheduler, Scheduler, ToastTimer};
use crate::storage::Storage;
use crate::store::CartStore;
use crate::view::{CartView, Links, Renderer};

/// Cart store plus its view, wired together.
#[derive(Debug)]
pub struct CartWidget<S, R, Sch> {
    store: CartStore<S>,
    view: CartView<R, Sch>,
}

impl<S: Storage, R: Renderer, Sch: Scheduler> CartWidget<S, R, Sch> {
    #[must_use]
    pub fn new(storage: S, renderer: R, scheduler: Sch, links: Links) -> Self {
        Self {
            store: CartStore::new(storage),
            view: CartView::new(renderer, scheduler, links),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    #[must_use]
    pub const fn view(&self) -> &CartView<R, Sch> {
        &self.view
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        self.view.renderer()
    }

    /// Current persisted cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.store.load()
    }

    /// Page load: draw the badge and, on the cart page, the cart.
    pub fn init(&mut self) {
        self.refresh();
    }

    /// Add one unit of a product, refresh the page and announce it.
    ///
    /// The toast names the product as it was just handed in, even when the
    /// cart keeps the name and price from an earlier add. The returned line
    /// item is the stored one.
    pub fn add_to_cart(&mut self, input: ProductInput) -> LineItem {
        let announced = input.clone().normalize();
        let item = self.store.add(input);
        self.refresh();
        self.view.notify(&announced);
        item
    }

    /// Lenient entry point for loosely-typed product objects.
    ///
    /// Objects without a usable id are logged and ignored.
    pub fn add_to_cart_json(&mut self, product: &Value) -> Option<LineItem> {
        match ProductInput::from_json(product) {
            Ok(input) => Some(self.add_to_cart(input)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring add to cart");
                None
            }
        }
    }

    pub fn remove_from_cart(&mut self, id: ProductId) {
        self.store.remove(id);
        self.refresh();
    }

    pub fn change_qty(&mut self, id: ProductId, delta: i64) -> QtyChange {
        let change = self.store.change_qty(id, delta);
        if change != QtyChange::Missing {
            self.refresh();
        }
        change
    }

    pub fn clear_cart(&mut self) {
        self.store.clear();
        self.refresh();
    }

    pub fn dismiss_notification(&mut self) {
        self.view.dismiss_notification();
    }

    pub fn on_timer(&mut self, timer: ToastTimer) {
        self.view.on_timer(timer);
    }

    fn refresh(&mut self) {
        let cart = self.store.load();
        self.view.render_badge(&cart);
        self.view.render_cart_page(&cart);
    }
}

impl<S: Storage, R: Renderer> CartWidget<S, R, ManualScheduler> {
    /// Let `by` pass on the virtual clock, firing due toast timers in order.
    pub fn advance_timers(&mut self, by: Duration) {
        let deadline = self.view.scheduler().now() + by;
        while let Some(timer) = self.view.scheduler_mut().pop_due(deadline) {
            self.view.on_timer(timer);
        }
        self.view.scheduler_mut().set_now(deadline);
    }
}
