//! Inbound product data and its normalisation into a line item.
//!
//! Catalog pages hand the cart loosely-typed product objects: ids may arrive
//! as strings, prices may be missing or garbage, descriptive fields may be
//! empty. [`ProductInput::from_json`] accepts that shape and
//! [`ProductInput::normalize`] applies the defaults every line item carries.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use super::{LineItem, Money, ProductId};

/// Default display name for products without one.
pub const DEFAULT_NAME: &str = "Produto";
/// Default image asset for products without one.
pub const DEFAULT_IMAGE: &str = "assets/img/img1.png";
/// Default descriptive line for products without one.
pub const DEFAULT_META: &str = "—";
/// Default tag for products without one.
pub const DEFAULT_TAG: &str = "Dia-a-dia";

/// Errors that can occur when reading a [`ProductInput`] from JSON.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductInputError {
    /// The input is not a JSON object.
    #[error("product must be a JSON object")]
    NotAnObject,
    /// The object has no usable `id` field.
    #[error("product id is missing")]
    MissingId,
    /// The `id` field cannot be coerced to an integer.
    #[error("product id {0} is not an integer")]
    InvalidId(String),
}

/// A product as handed to the cart by catalog pages.
///
/// Only `id` is required; every other field falls back to a default during
/// [`normalize`](Self::normalize).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub id: ProductId,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub meta: Option<String>,
    pub tag: Option<String>,
}

impl ProductInput {
    /// Create an input with only an id.
    #[must_use]
    pub const fn new(id: ProductId) -> Self {
        Self {
            id,
            name: None,
            price: None,
            image: None,
            meta: None,
            tag: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Read a product from a loosely-typed JSON object.
    ///
    /// `id` accepts integers, integral floats and numeric strings. `price`
    /// accepts numbers and numeric strings; anything else is dropped and later
    /// defaults to zero. String fields accept strings and numbers.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object or its `id` cannot be
    /// coerced to an integer.
    pub fn from_json(value: &Value) -> Result<Self, ProductInputError> {
        let object = value.as_object().ok_or(ProductInputError::NotAnObject)?;
        let id = object
            .get("id")
            .filter(|v| !v.is_null())
            .ok_or(ProductInputError::MissingId)
            .and_then(coerce_id)?;

        Ok(Self {
            id,
            name: object.get("name").and_then(coerce_text),
            price: object.get("price").and_then(coerce_decimal),
            image: object.get("image").and_then(coerce_text),
            meta: object.get("meta").and_then(coerce_text),
            tag: object.get("tag").and_then(coerce_text),
        })
    }

    /// Apply defaults and build a fresh line item with quantity 1.
    ///
    /// Empty strings count as absent. Negative prices become zero.
    #[must_use]
    pub fn normalize(self) -> LineItem {
        let price = self
            .price
            .filter(|p| !p.is_sign_negative())
            .unwrap_or(Decimal::ZERO);

        LineItem {
            id: self.id,
            name: non_empty_or(self.name, DEFAULT_NAME),
            price: Money::new(price),
            image: non_empty_or(self.image, DEFAULT_IMAGE),
            meta: non_empty_or(self.meta, DEFAULT_META),
            tag: non_empty_or(self.tag, DEFAULT_TAG),
            qty: 1,
        }
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn coerce_id(value: &Value) -> Result<ProductId, ProductInputError> {
    let invalid = || ProductInputError::InvalidId(value.to_string());
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral_f64))
            .map(ProductId::new)
            .ok_or_else(invalid),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_f64))
                .map(ProductId::new)
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn integral_f64(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64).then_some(f as i64)
}

fn coerce_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        // `Decimal::from_str` would accept digit separators such as `1_000`.
        Value::String(s) if s.contains('_') => return None,
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_normalize_applies_defaults() {
        let item = ProductInput::new(ProductId::new(3)).normalize();
        assert_eq!(item.name, DEFAULT_NAME);
        assert_eq!(item.price, Money::ZERO);
        assert_eq!(item.image, DEFAULT_IMAGE);
        assert_eq!(item.meta, DEFAULT_META);
        assert_eq!(item.tag, DEFAULT_TAG);
        assert_eq!(item.qty, 1);
    }

    #[test]
    fn test_normalize_treats_empty_strings_as_absent() {
        let item = ProductInput::new(ProductId::new(3))
            .with_name("")
            .with_tag("")
            .normalize();
        assert_eq!(item.name, DEFAULT_NAME);
        assert_eq!(item.tag, DEFAULT_TAG);
    }

    #[test]
    fn test_normalize_clamps_negative_price() {
        let item = ProductInput::new(ProductId::new(1))
            .with_price(Decimal::new(-500, 2))
            .normalize();
        assert_eq!(item.price, Money::ZERO);
    }

    #[test]
    fn test_from_json_coerces_numeric_strings() {
        let input = ProductInput::from_json(&json!({
            "id": "12",
            "name": "Vinho Tinto",
            "price": "12.5",
            "tag": "Reserva"
        }))
        .unwrap();

        assert_eq!(input.id, ProductId::new(12));
        assert_eq!(input.name.as_deref(), Some("Vinho Tinto"));
        assert_eq!(input.price, Some(Decimal::new(125, 1)));
        assert_eq!(input.tag.as_deref(), Some("Reserva"));
        assert_eq!(input.image, None);
    }

    #[test]
    fn test_from_json_accepts_integral_float_id() {
        let input = ProductInput::from_json(&json!({ "id": 4.0 })).unwrap();
        assert_eq!(input.id, ProductId::new(4));
    }

    #[test]
    fn test_from_json_invalid_price_defaults_to_zero() {
        let input = ProductInput::from_json(&json!({ "id": 1, "price": "abc" })).unwrap();
        assert_eq!(input.price, None);
        assert_eq!(input.normalize().price, Money::ZERO);

        let input = ProductInput::from_json(&json!({ "id": 1, "price": [1] })).unwrap();
        assert_eq!(input.price, None);
    }

    #[test]
    fn test_from_json_rejects_digit_separators_in_price() {
        let input = ProductInput::from_json(&json!({ "id": 1, "price": "1_000" })).unwrap();
        assert_eq!(input.price, None);
        assert_eq!(input.normalize().price, Money::ZERO);

        let input = ProductInput::from_json(&json!({ "id": 1, "price": " 1000 " })).unwrap();
        assert_eq!(input.price, Some(Decimal::new(1000, 0)));
    }

    #[test]
    fn test_from_json_rejects_bad_ids() {
        assert_eq!(
            ProductInput::from_json(&json!({ "name": "x" })),
            Err(ProductInputError::MissingId)
        );
        assert_eq!(
            ProductInput::from_json(&json!({ "id": null })),
            Err(ProductInputError::MissingId)
        );
        assert!(matches!(
            ProductInput::from_json(&json!({ "id": "abc" })),
            Err(ProductInputError::InvalidId(_))
        ));
        assert!(matches!(
            ProductInput::from_json(&json!({ "id": 1.5 })),
            Err(ProductInputError::InvalidId(_))
        ));
        assert_eq!(
            ProductInput::from_json(&json!([1, 2])),
            Err(ProductInputError::NotAnObject)
        );
    }
}
