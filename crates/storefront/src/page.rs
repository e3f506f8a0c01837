//! HTML page adapter.
//!
//! `HtmlPage` models the elements a host page may carry as optional slots and
//! fills them with askama-rendered fragments. A slot that is `None` is an
//! element the page does not have; rendering into it is skipped.

use askama::Template;

use crate::notification::ToastPhase;
use crate::view::{LineItemView, Links, Renderer, ToastView, TotalsView};

/// Which elements a page carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Slots {
    /// `#cart-count`
    pub count: bool,
    /// `.cart-badge`
    pub badge: bool,
    /// `#cart-items`
    pub items: bool,
    /// `#cart-subtotal`
    pub subtotal: bool,
    /// `#cart-total`
    pub total: bool,
}

impl Slots {
    /// Catalog and product pages: only the navbar count indicators.
    pub const CATALOG: Self = Self {
        count: true,
        badge: true,
        items: false,
        subtotal: false,
        total: false,
    };

    /// The cart page: every element.
    pub const CART: Self = Self {
        count: true,
        badge: true,
        items: true,
        subtotal: true,
        total: true,
    };
}

#[derive(Template)]
#[template(path = "cart_items.html")]
struct CartItemsTemplate<'a> {
    items: &'a [LineItemView],
}

#[derive(Template)]
#[template(path = "cart_empty.html")]
struct CartEmptyTemplate<'a> {
    catalog_href: &'a str,
}

#[derive(Template)]
#[template(path = "toast.html")]
struct ToastTemplate<'a> {
    toast: &'a ToastView,
    classes: &'a str,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'a str,
    catalog_href: &'a str,
    cart_href: &'a str,
    count: Option<&'a str>,
    badge: Option<&'a str>,
    items: Option<&'a str>,
    subtotal: Option<&'a str>,
    total: Option<&'a str>,
    toast: Option<&'a str>,
}

/// An in-memory HTML page the cart renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlPage {
    title: String,
    links: Links,
    count: Option<String>,
    badge: Option<String>,
    items: Option<String>,
    subtotal: Option<String>,
    total: Option<String>,
    toast: Option<String>,
}

impl HtmlPage {
    #[must_use]
    pub fn new(title: impl Into<String>, slots: Slots, links: Links) -> Self {
        let slot = |present: bool| present.then(String::new);
        Self {
            title: title.into(),
            links,
            count: slot(slots.count),
            badge: slot(slots.badge),
            items: slot(slots.items),
            subtotal: slot(slots.subtotal),
            total: slot(slots.total),
            toast: None,
        }
    }

    #[must_use]
    pub fn catalog(links: Links) -> Self {
        Self::new("Catálogo", Slots::CATALOG, links)
    }

    #[must_use]
    pub fn cart(links: Links) -> Self {
        Self::new("Carrinho", Slots::CART, links)
    }

    /// Text of `#cart-count`, if the page has it.
    #[must_use]
    pub fn count(&self) -> Option<&str> {
        self.count.as_deref()
    }

    /// Text of `.cart-badge`, if the page has it.
    #[must_use]
    pub fn badge(&self) -> Option<&str> {
        self.badge.as_deref()
    }

    /// Inner HTML of `#cart-items`, if the page has it.
    #[must_use]
    pub fn items_html(&self) -> Option<&str> {
        self.items.as_deref()
    }

    #[must_use]
    pub fn subtotal(&self) -> Option<&str> {
        self.subtotal.as_deref()
    }

    #[must_use]
    pub fn total(&self) -> Option<&str> {
        self.total.as_deref()
    }

    /// Markup of the toast element while one exists.
    #[must_use]
    pub fn toast_html(&self) -> Option<&str> {
        self.toast.as_deref()
    }

    /// Render the whole page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page template fails to render.
    pub fn document(&self) -> askama::Result<String> {
        PageTemplate {
            title: &self.title,
            catalog_href: &self.links.catalog,
            cart_href: &self.links.cart,
            count: self.count.as_deref(),
            badge: self.badge.as_deref(),
            items: self.items.as_deref(),
            subtotal: self.subtotal.as_deref(),
            total: self.total.as_deref(),
            toast: self.toast.as_deref(),
        }
        .render()
    }

    fn set_totals(&mut self, totals: &TotalsView) {
        if let Some(slot) = self.subtotal.as_mut() {
            slot.clone_from(&totals.subtotal);
        }
        if let Some(slot) = self.total.as_mut() {
            slot.clone_from(&totals.total);
        }
    }

    fn set_items(&mut self, rendered: askama::Result<String>) {
        let Some(slot) = self.items.as_mut() else {
            return;
        };
        match rendered {
            Ok(html) => *slot = html,
            Err(e) => tracing::warn!(error = %e, "Failed to render cart items"),
        }
    }
}

impl Renderer for HtmlPage {
    fn render_badge(&mut self, count: u64) {
        let text = count.to_string();
        if let Some(slot) = self.count.as_mut() {
            slot.clone_from(&text);
        }
        if let Some(slot) = self.badge.as_mut() {
            *slot = text;
        }
    }

    fn has_cart_container(&self) -> bool {
        self.items.is_some()
    }

    fn render_list(&mut self, items: &[LineItemView], totals: &TotalsView) {
        let rendered = CartItemsTemplate { items }.render();
        self.set_items(rendered);
        self.set_totals(totals);
    }

    fn render_empty_state(&mut self, totals: &TotalsView) {
        let rendered = CartEmptyTemplate {
            catalog_href: &self.links.catalog,
        }
        .render();
        self.set_items(rendered);
        self.set_totals(totals);
    }

    fn render_toast(&mut self, toast: &ToastView) {
        let rendered = ToastTemplate {
            toast,
            classes: toast.phase.css_classes(),
        }
        .render();
        match rendered {
            Ok(html) => self.toast = Some(html),
            Err(e) => tracing::warn!(error = %e, "Failed to render toast"),
        }
    }

    fn remove_toast(&mut self) {
        self.toast = None;
    }
}
