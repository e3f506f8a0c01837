//! The cart: an ordered list of line items with unique product ids.
//!
//! `Cart` only knows about its own contents. Loading and persisting it is the
//! storefront's job; this module keeps the invariants:
//!
//! - insertion order is preserved,
//! - no two items share an id,
//! - every item has `qty >= 1`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{LineItem, Money, ProductId};

/// Outcome of [`Cart::change_qty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QtyChange {
    /// No item with that id.
    Missing,
    /// The item now has this quantity.
    Updated(u32),
    /// The quantity dropped to zero or below and the item was removed.
    Removed,
}

/// Ordered collection of line items.
///
/// Serialises as a bare JSON array of line item records. Deserialising goes
/// through [`Cart::from_records`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw records, dropping zero quantities and later
    /// duplicates of an id.
    ///
    /// Returns the cart and the number of records dropped.
    #[must_use]
    pub fn from_records(records: Vec<LineItem>) -> (Self, usize) {
        let total = records.len();
        let mut cart = Self::new();
        for record in records {
            if record.qty == 0 || cart.contains(record.id) {
                continue;
            }
            cart.items.push(record);
        }
        let dropped = total - cart.items.len();
        (cart, dropped)
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Add one unit of a product.
    ///
    /// If the id is already present only its quantity grows; the stored name,
    /// price and other fields are kept from the first add. Otherwise `item` is
    /// appended with quantity 1.
    #[allow(clippy::indexing_slicing)] // index comes from position() or len() - 1
    pub fn add(&mut self, item: LineItem) -> &LineItem {
        let index = if let Some(index) = self.position(item.id) {
            if let Some(existing) = self.items.get_mut(index) {
                existing.qty = existing.qty.saturating_add(1);
            }
            index
        } else {
            self.items.push(LineItem { qty: 1, ..item });
            self.items.len() - 1
        };

        &self.items[index]
    }

    /// Remove the item with this id, returning it if it was present.
    pub fn remove(&mut self, id: ProductId) -> Option<LineItem> {
        self.position(id).map(|index| self.items.remove(index))
    }

    /// Add a signed delta to an item's quantity, removing it at zero or below.
    pub fn change_qty(&mut self, id: ProductId, delta: i64) -> QtyChange {
        let Some(index) = self.position(id) else {
            return QtyChange::Missing;
        };

        let current = self.items.get(index).map_or(0, |item| i64::from(item.qty));
        let next = current.saturating_add(delta);
        if next <= 0 {
            self.items.remove(index);
            return QtyChange::Removed;
        }

        let qty = u32::try_from(next).unwrap_or(u32::MAX);
        if let Some(item) = self.items.get_mut(index) {
            item.qty = qty;
        }
        QtyChange::Updated(qty)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across all items.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.qty)).sum()
    }

    /// Sum of `price × qty` across all items.
    #[must_use]
    pub fn total_amount(&self) -> Money {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<LineItem>::deserialize(deserializer)?;
        Ok(Self::from_records(records).0)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = core::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::ProductInput;

    fn wine(id: i64, price_cents: i64) -> LineItem {
        ProductInput::new(ProductId::new(id))
            .with_name(format!("Vinho {id}"))
            .with_price(Decimal::new(price_cents, 2))
            .normalize()
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut cart = Cart::new();
        cart.add(wine(3, 100));
        cart.add(wine(1, 100));
        cart.add(wine(2, 100));

        let ids: Vec<i64> = cart.iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_add_existing_keeps_first_seen_fields() {
        let mut cart = Cart::new();
        cart.add(wine(1, 1200));

        let mut changed = wine(1, 9999);
        changed.name = "Outro nome".to_string();
        changed.image = "other.png".to_string();
        let item = cart.add(changed).clone();

        assert_eq!(item.qty, 2);
        assert_eq!(item.name, "Vinho 1");
        assert_eq!(item.price, Money::from_cents(1200));
        assert_eq!(item.image, "assets/img/img1.png");
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_forces_quantity_one() {
        let mut cart = Cart::new();
        let mut item = wine(1, 100);
        item.qty = 9;
        assert_eq!(cart.add(item).qty, 1);
    }

    #[test]
    fn test_change_qty() {
        let mut cart = Cart::new();
        cart.add(wine(1, 100));

        assert_eq!(cart.change_qty(ProductId::new(1), 4), QtyChange::Updated(5));
        assert_eq!(cart.change_qty(ProductId::new(1), -1), QtyChange::Updated(4));
        assert_eq!(cart.change_qty(ProductId::new(2), 1), QtyChange::Missing);
        assert_eq!(cart.change_qty(ProductId::new(1), -4), QtyChange::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_qty_below_zero_removes() {
        let mut cart = Cart::new();
        cart.add(wine(1, 100));
        cart.add(wine(2, 100));

        assert_eq!(cart.change_qty(ProductId::new(1), -10), QtyChange::Removed);
        assert!(!cart.contains(ProductId::new(1)));
        assert!(cart.contains(ProductId::new(2)));
    }

    #[test]
    fn test_change_qty_saturates() {
        let mut cart = Cart::new();
        cart.add(wine(1, 100));
        assert_eq!(
            cart.change_qty(ProductId::new(1), i64::MAX),
            QtyChange::Updated(u32::MAX)
        );
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(wine(1, 100));
        let before = cart.clone();

        assert!(cart.remove(ProductId::new(99)).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_total_amount() {
        let mut cart = Cart::new();
        cart.add(wine(1, 1000));
        cart.add(wine(1, 1000));
        cart.add(wine(2, 550));

        assert_eq!(cart.total_amount(), Money::new(Decimal::new(255, 1)));
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(Cart::new().total_amount(), Money::ZERO);
        assert_eq!(Cart::new().total_quantity(), 0);
    }

    #[test]
    fn test_from_records_drops_invalid_rows() {
        let mut zero = wine(2, 100);
        zero.qty = 0;
        let mut dup = wine(1, 500);
        dup.qty = 7;

        let (cart, dropped) = Cart::from_records(vec![wine(1, 100), zero, dup, wine(3, 100)]);
        assert_eq!(dropped, 2);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(ProductId::new(1)).map(|i| i.qty), Some(1));
    }

    #[test]
    fn test_serializes_as_array() {
        let mut cart = Cart::new();
        cart.add(wine(1, 1200));
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["qty"], 1);
        assert_eq!(json[0]["id"], 1);
    }

    #[test]
    fn test_deserialize_enforces_invariants() {
        let cart: Cart = serde_json::from_str(
            r#"[{"id":1,"name":"A","price":"1","image":"","meta":"","tag":"","qty":2},
                {"id":2,"name":"B","price":"1","image":"","meta":"","tag":"","qty":0},
                {"id":1,"name":"C","price":"9","image":"","meta":"","tag":"","qty":5}]"#,
        )
        .unwrap();

        assert_eq!(cart.len(), 1);
        let item = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(item.name, "A");
        assert_eq!(item.qty, 2);
    }

    #[test]
    fn test_totals_saturate_at_extremes() {
        let mut cart = Cart::new();
        cart.add(
            ProductInput::new(ProductId::new(1))
                .with_price(Decimal::MAX)
                .normalize(),
        );
        cart.add(wine(2, 100));
        cart.change_qty(ProductId::new(1), i64::MAX);
        cart.change_qty(ProductId::new(2), i64::MAX);

        assert_eq!(cart.total_amount(), Money::new(Decimal::MAX));
        assert_eq!(cart.total_quantity(), 2 * u64::from(u32::MAX));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Total quantity counts every add; line count counts distinct ids.
        #[test]
        fn prop_add_counts(ids in prop::collection::vec(0i64..20, 0..60)) {
            let mut cart = Cart::new();
            for id in &ids {
                cart.add(wine(*id, 100));
            }

            let mut distinct = ids.clone();
            distinct.sort_unstable();
            distinct.dedup();

            prop_assert_eq!(cart.total_quantity(), ids.len() as u64);
            prop_assert_eq!(cart.len(), distinct.len());
        }

        /// Totals never overflow, whatever the prices and quantities.
        #[test]
        fn prop_totals_tolerate_extreme_values(
            lines in prop::collection::vec(
                (
                    prop_oneof![
                        Just(Decimal::MAX),
                        (0i64..i64::MAX).prop_map(|c| Decimal::new(c, 2)),
                        (0u32..=19).prop_map(|exp| Decimal::MAX / Decimal::from(10u64.pow(exp))),
                    ],
                    prop_oneof![Just(u32::MAX), 1u32..=u32::MAX],
                ),
                0..8,
            ),
        ) {
            let mut cart = Cart::new();
            for (index, (price, qty)) in lines.into_iter().enumerate() {
                let id = ProductId::new(i64::try_from(index).unwrap());
                cart.add(ProductInput::new(id).with_price(price).normalize());
                cart.change_qty(id, i64::from(qty) - 1);
            }

            let total = cart.total_amount();
            prop_assert!(!total.amount().is_sign_negative());
            prop_assert!(cart.items().iter().all(|item| item.subtotal() <= total));
            prop_assert!(!total.format_eur().is_empty());
        }

        /// Quantities never drop to zero while an item is held.
        #[test]
        fn prop_quantities_stay_positive(
            ops in prop::collection::vec((0i64..5, -3i64..4), 0..80),
        ) {
            let mut cart = Cart::new();
            for (id, delta) in ops {
                if delta == 0 {
                    cart.add(wine(id, 100));
                } else {
                    cart.change_qty(ProductId::new(id), delta);
                }
                prop_assert!(cart.iter().all(|item| item.qty >= 1));
            }
        }
    }
}
