//! Cart mutation and inspection commands.
//!
//! Every command opens the file-backed cart, performs one widget call and
//! exits, the same load-mutate-save cycle a page goes through per click.

use rust_decimal::Decimal;
use tracing::info;

use wine_store_core::{ProductId, ProductInput, QtyChange};
use wine_store_storefront::notification::{ManualScheduler, TokioScheduler};
use wine_store_storefront::{HtmlPage, WidgetConfig, WidgetError};

use super::{emit, open_widget};

/// Product fields as given on the command line.
pub struct ProductArgs {
    pub id: i64,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub meta: Option<String>,
    pub tag: Option<String>,
}

impl From<ProductArgs> for ProductInput {
    fn from(args: ProductArgs) -> Self {
        Self {
            id: ProductId::new(args.id),
            name: args.name,
            price: args.price,
            image: args.image,
            meta: args.meta,
            tag: args.tag,
        }
    }
}

/// Add one unit of a product and print the toast markup.
///
/// With `wait`, stays until the toast has run its course, logging each phase.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be opened or output fails.
pub async fn add(
    config: &WidgetConfig,
    input: ProductInput,
    wait: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (scheduler, mut timers) = TokioScheduler::new();
    let mut widget = open_widget(config, HtmlPage::catalog(config.links.clone()), scheduler)?;

    let item = widget.add_to_cart(input);
    info!(
        id = %item.id,
        qty = item.qty,
        cart_count = widget.store().total_quantity(),
        "Added to cart"
    );
    if let Some(html) = widget.renderer().toast_html() {
        emit(html)?;
    }

    if wait {
        while widget.view().toaster().is_visible() {
            let Some(timer) = timers.recv().await else {
                break;
            };
            widget.on_timer(timer);
            if let Some(toast) = widget.view().toaster().current() {
                info!(phase = ?toast.phase, "Toast");
            }
        }
    }
    Ok(())
}

/// Add a product given as a loosely-typed JSON object.
///
/// # Errors
///
/// Returns an error if the argument is not JSON, the product has no usable
/// id, or storage cannot be opened.
pub fn add_json(config: &WidgetConfig, json: &str) -> Result<(), Box<dyn std::error::Error>> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(WidgetError::from)?;
    // Validate up front so the CLI reports what the page would silently drop.
    let input = ProductInput::from_json(&value).map_err(WidgetError::from)?;

    let mut widget = open_widget(config, HtmlPage::catalog(config.links.clone()), ManualScheduler::new())?;
    let item = widget.add_to_cart(input);
    info!(id = %item.id, qty = item.qty, "Added to cart");
    if let Some(html) = widget.renderer().toast_html() {
        emit(html)?;
    }
    Ok(())
}

/// Remove a product.
///
/// # Errors
///
/// Returns an error if storage cannot be opened.
pub fn remove(config: &WidgetConfig, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let mut widget = open_widget(config, HtmlPage::catalog(config.links.clone()), ManualScheduler::new())?;
    widget.remove_from_cart(ProductId::new(id));
    info!(id, cart_count = widget.store().total_quantity(), "Removed from cart");
    Ok(())
}

/// Change a product's quantity by `delta`.
///
/// # Errors
///
/// Returns an error if storage cannot be opened.
pub fn change_qty(
    config: &WidgetConfig,
    id: i64,
    delta: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut widget = open_widget(config, HtmlPage::catalog(config.links.clone()), ManualScheduler::new())?;
    match widget.change_qty(ProductId::new(id), delta) {
        QtyChange::Missing => info!(id, "Product not in cart"),
        QtyChange::Updated(qty) => info!(id, qty, "Quantity updated"),
        QtyChange::Removed => info!(id, "Removed from cart"),
    }
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if storage cannot be opened.
pub fn clear(config: &WidgetConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut widget = open_widget(config, HtmlPage::catalog(config.links.clone()), ManualScheduler::new())?;
    widget.clear_cart();
    info!("Cart cleared");
    Ok(())
}

/// Print the cart contents and totals.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or output fails.
pub fn show(config: &WidgetConfig) -> Result<(), Box<dyn std::error::Error>> {
    let widget = open_widget(config, HtmlPage::catalog(config.links.clone()), ManualScheduler::new())?;
    let cart = widget.cart();

    if cart.is_empty() {
        emit("O seu carrinho está vazio")?;
        return Ok(());
    }

    let mut lines: Vec<String> = cart
        .iter()
        .map(|item| {
            format!(
                "#{:<6} {:<32} x{:<4} {:>14} {:>14}",
                item.id,
                item.name,
                item.qty,
                item.price.format_eur(),
                item.subtotal().format_eur()
            )
        })
        .collect();
    lines.push(format!(
        "Items: {}  Total: {}",
        cart.total_quantity(),
        cart.total_amount().format_eur()
    ));
    emit(&lines.join("\n"))?;
    Ok(())
}
