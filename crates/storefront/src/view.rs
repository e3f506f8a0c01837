//! Read-only presentation of the cart.
//!
//! `CartView` turns a cart snapshot into display models and hands them to a
//! [`Renderer`]. It never mutates the cart; user actions wired into the
//! rendered markup go back through the widget to the store.

use wine_store_core::{Cart, LineItem, Money};

use crate::notification::{Scheduler, ToastPhase, ToastTimer, Toaster};

/// Page link used by the toast and the empty-state call-to-action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    pub catalog: String,
    pub cart: String,
}

impl Default for Links {
    fn default() -> Self {
        Self {
            catalog: "catalog.html".to_string(),
            cart: "cart.html".to_string(),
        }
    }
}

/// Line item display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemView {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub meta: String,
    pub tag: String,
    pub tag_class: &'static str,
    pub qty: u32,
    pub price: String,
    pub subtotal: String,
}

impl From<&LineItem> for LineItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.as_i64(),
            name: item.name.clone(),
            image: item.image.clone(),
            meta: item.meta.clone(),
            tag: item.tag.clone(),
            tag_class: item.category().css_class(),
            qty: item.qty,
            price: format_currency(item.price),
            subtotal: format_currency(item.subtotal()),
        }
    }
}

/// Cart summary display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsView {
    pub subtotal: String,
    pub total: String,
}

impl TotalsView {
    #[must_use]
    pub fn new(amount: Money) -> Self {
        let formatted = format_currency(amount);
        Self {
            subtotal: formatted.clone(),
            total: formatted,
        }
    }

    #[must_use]
    pub fn zero() -> Self {
        Self::new(Money::ZERO)
    }
}

/// Toast display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub product_name: String,
    pub price: String,
    pub cart_href: String,
    pub phase: ToastPhase,
}

/// Page adapter capability.
///
/// Every method must tolerate the target element being absent from the
/// current page and do nothing in that case.
pub trait Renderer {
    /// Show the total item count on every count indicator present.
    fn render_badge(&mut self, count: u64);

    /// Whether the page has a cart items container.
    fn has_cart_container(&self) -> bool;

    /// Render one row per item plus the summary totals.
    fn render_list(&mut self, items: &[LineItemView], totals: &TotalsView);

    /// Render the empty-cart message plus (zero) summary totals.
    fn render_empty_state(&mut self, totals: &TotalsView);

    /// Create or update the single toast element.
    fn render_toast(&mut self, toast: &ToastView);

    /// Remove the toast element if present.
    fn remove_toast(&mut self);
}

/// Format an amount the way every price on the page is shown.
#[must_use]
pub fn format_currency(amount: Money) -> String {
    amount.format_eur()
}

/// Presenter driving a [`Renderer`] and the toast lifecycle.
#[derive(Debug)]
pub struct CartView<R, Sch> {
    renderer: R,
    scheduler: Sch,
    toaster: Toaster,
    links: Links,
}

impl<R: Renderer, Sch: Scheduler> CartView<R, Sch> {
    #[must_use]
    pub fn new(renderer: R, scheduler: Sch, links: Links) -> Self {
        Self {
            renderer,
            scheduler,
            toaster: Toaster::new(),
            links,
        }
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub const fn scheduler(&self) -> &Sch {
        &self.scheduler
    }

    pub const fn scheduler_mut(&mut self) -> &mut Sch {
        &mut self.scheduler
    }

    #[must_use]
    pub const fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    #[must_use]
    pub const fn links(&self) -> &Links {
        &self.links
    }

    pub fn render_badge(&mut self, cart: &Cart) {
        self.renderer.render_badge(cart.total_quantity());
    }

    /// Render the cart page, or nothing when the page has no cart container.
    pub fn render_cart_page(&mut self, cart: &Cart) {
        if !self.renderer.has_cart_container() {
            tracing::trace!("No cart container on this page");
            return;
        }

        if cart.is_empty() {
            self.renderer.render_empty_state(&TotalsView::zero());
            return;
        }

        let items: Vec<LineItemView> = cart.iter().map(LineItemView::from).collect();
        self.renderer
            .render_list(&items, &TotalsView::new(cart.total_amount()));
    }

    /// Announce an added item, replacing any toast already showing.
    pub fn notify(&mut self, item: &LineItem) {
        if self.toaster.show(item, &mut self.scheduler).is_some() {
            self.renderer.remove_toast();
        }
        self.render_toast();
    }

    /// Close button on the toast.
    pub fn dismiss_notification(&mut self) {
        if self.toaster.dismiss(&mut self.scheduler).is_some() {
            self.render_toast();
        }
    }

    /// Deliver a fired timer.
    pub fn on_timer(&mut self, timer: ToastTimer) {
        if self.toaster.fire(timer, &mut self.scheduler).is_some() {
            self.render_toast();
        }
    }

    fn render_toast(&mut self) {
        let Some(toast) = self.toaster.current() else {
            return;
        };

        if toast.phase == ToastPhase::Removed {
            self.renderer.remove_toast();
            return;
        }

        let view = ToastView {
            product_name: toast.product_name.clone(),
            price: format_currency(toast.price),
            cart_href: self.links.cart.clone(),
            phase: toast.phase,
        };
        self.renderer.render_toast(&view);
    }
}
