//! Unified error type for hosts driving the widget.
//!
//! Cart operations themselves never fail; these errors come from setting the
//! widget up (configuration, opening storage) and from producing output
//! (rendering a full document). Hosts such as the CLI report them.

use thiserror::Error;

use wine_store_core::ProductInputError;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Widget-level error type.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Product data could not be read.
    #[error("Invalid product: {0}")]
    Input(#[from] ProductInputError),

    /// A template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Input was not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for `WidgetError`.
pub type Result<T> = std::result::Result<T, WidgetError>;
