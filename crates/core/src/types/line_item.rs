//! Cart line items.

use serde::{Deserialize, Serialize};

use super::{Money, ProductId};

/// One product row in the cart.
///
/// Serialised field names match the records stored by the catalog pages:
/// `id`, `name`, `price`, `image`, `meta`, `tag`, `qty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    /// Unit price as seen on first add.
    pub price: Money,
    pub image: String,
    pub meta: String,
    pub tag: String,
    /// Always at least 1 for an item held in a cart.
    pub qty: u32,
}

impl LineItem {
    /// `price × qty`.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.price * self.qty
    }

    #[must_use]
    pub fn category(&self) -> TagCategory {
        TagCategory::from_tag(&self.tag)
    }
}

/// Cosmetic wine category derived from a line item's tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TagCategory {
    #[default]
    DiaADia,
    Premium,
    Reservas,
}

impl TagCategory {
    /// Classify a free-form tag, case-insensitively by substring.
    ///
    /// "reserva" takes precedence over "premium".
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_lowercase();
        if tag.contains("reserva") {
            Self::Reservas
        } else if tag.contains("premium") {
            Self::Premium
        } else {
            Self::DiaADia
        }
    }

    /// CSS class applied to the tag pill.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::DiaADia => "tag-diaadia",
            Self::Premium => "tag-premium",
            Self::Reservas => "tag-reservas",
        }
    }
}
