//! Page rendering command.

use std::path::Path;

use tracing::info;

use wine_store_storefront::notification::ManualScheduler;
use wine_store_storefront::{HtmlPage, WidgetConfig, WidgetError};

use super::{emit, open_widget};
use crate::PageKind;

/// Render a page as it looks after load, to `out` or stdout.
///
/// # Errors
///
/// Returns an error if storage cannot be opened, the template fails, or the
/// output cannot be written.
pub fn page(
    config: &WidgetConfig,
    kind: PageKind,
    out: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let layout = match kind {
        PageKind::Cart => HtmlPage::cart(config.links.clone()),
        PageKind::Catalog => HtmlPage::catalog(config.links.clone()),
    };

    let mut widget = open_widget(config, layout, ManualScheduler::new())?;
    widget.init();
    let html = widget.renderer().document().map_err(WidgetError::from)?;

    match out {
        Some(path) => {
            std::fs::write(path, &html)?;
            info!(path = %path.display(), bytes = html.len(), "Page written");
        }
        None => emit(&html)?,
    }
    Ok(())
}
