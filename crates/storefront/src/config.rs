//! Widget configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `WINE_STORE_DATA_DIR` - Directory backing the cart storage slot (default: `.wine-store`)
//! - `WINE_STORE_CATALOG_URL` - Catalog link used by the empty cart (default: `catalog.html`)
//! - `WINE_STORE_CART_URL` - Cart link used by the toast and navbar (default: `cart.html`)
//! - `WINE_STORE_LOG_FORMAT` - `pretty` or `json` (default: `pretty`)

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::view::Links;

const DEFAULT_DATA_DIR: &str = ".wine-store";
const DEFAULT_CATALOG_URL: &str = "catalog.html";
const DEFAULT_CART_URL: &str = "cart.html";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Cart widget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Directory holding the cart storage slot
    pub data_dir: PathBuf,
    /// Catalog and cart page links
    pub links: Links,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            links: Links {
                catalog: DEFAULT_CATALOG_URL.to_string(),
                cart: DEFAULT_CART_URL.to_string(),
            },
            log_format: LogFormat::default(),
        }
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(get_or_default(&lookup, "WINE_STORE_DATA_DIR", DEFAULT_DATA_DIR));
        let catalog = get_link(&lookup, "WINE_STORE_CATALOG_URL", DEFAULT_CATALOG_URL)?;
        let cart = get_link(&lookup, "WINE_STORE_CART_URL", DEFAULT_CART_URL)?;
        let log_format = get_or_default(&lookup, "WINE_STORE_LOG_FORMAT", "pretty")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("WINE_STORE_LOG_FORMAT".to_string(), e))?;

        Ok(Self {
            data_dir,
            links: Links { catalog, cart },
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value. Blank values count as unset.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Get a link target; whitespace would break the generated `href`.
fn get_link(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<String, ConfigError> {
    let value = get_or_default(lookup, key, default).trim().to_string();
    if value.chars().any(char::is_whitespace) || value.contains('"') {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "link must not contain whitespace or quotes".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.links.cart, "cart.html");
        assert_eq!(config.data_dir, PathBuf::from(".wine-store"));
    }

    #[test]
    fn test_overrides() {
        let config = WidgetConfig::from_lookup(lookup(&[
            ("WINE_STORE_DATA_DIR", "/tmp/cart"),
            ("WINE_STORE_CATALOG_URL", "/vinhos"),
            ("WINE_STORE_CART_URL", " /carrinho "),
            ("WINE_STORE_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/cart"));
        assert_eq!(config.links.catalog, "/vinhos");
        assert_eq!(config.links.cart, "/carrinho");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = WidgetConfig::from_lookup(lookup(&[("WINE_STORE_CART_URL", "  ")])).unwrap();
        assert_eq!(config.links.cart, "cart.html");
    }

    #[test]
    fn test_invalid_log_format() {
        let err = WidgetConfig::from_lookup(lookup(&[("WINE_STORE_LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "WINE_STORE_LOG_FORMAT"));
    }

    #[test]
    fn test_invalid_link() {
        let err =
            WidgetConfig::from_lookup(lookup(&[("WINE_STORE_CATALOG_URL", "a b.html")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "WINE_STORE_CATALOG_URL"));
    }
}
