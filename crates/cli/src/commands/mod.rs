//! CLI command implementations.

use std::io::{self, Write};

use wine_store_storefront::notification::Scheduler;
use wine_store_storefront::{CartWidget, FileStorage, Renderer, StorageError, WidgetConfig};

pub mod cart;
pub mod render;

/// Open the widget over the configured storage directory.
fn open_widget<R: Renderer, Sch: Scheduler>(
    config: &WidgetConfig,
    renderer: R,
    scheduler: Sch,
) -> Result<CartWidget<FileStorage, R, Sch>, StorageError> {
    let storage = FileStorage::open(&config.data_dir)?;
    tracing::debug!(dir = %storage.dir().display(), "Opened cart storage");
    Ok(CartWidget::new(
        storage,
        renderer,
        scheduler,
        config.links.clone(),
    ))
}

/// Write a block of output to stdout.
fn emit(text: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{text}")
}
