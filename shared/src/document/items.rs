//! Ordered collection of line items with per-document uniqueness

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::{WorkflowError, WorkflowResult};
use super::line_item::{LineItem, LineItemId, LineItemInput};
use crate::types::EntityId;

/// Rows of a document in display order
///
/// No two rows may reference the same product or menu. Rows read from the
/// wire go through [`LineItems::from_rows`], so a server reply breaking the
/// row rules fails to decode instead of becoming local state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct LineItems(Vec<LineItem>);

impl LineItems {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Wrap rows coming from the server, refusing duplicate keys, zero
    /// quantities and negative prices
    pub fn from_rows(rows: Vec<LineItem>) -> WorkflowResult<Self> {
        let mut seen = HashSet::new();
        for row in &rows {
            row.check()?;
            if !seen.insert(row.key) {
                return Err(WorkflowError::DuplicateItem { key: row.key });
            }
        }
        Ok(Self(rows))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[LineItem] {
        &self.0
    }

    pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
        self.0.iter().find(|item| item.id == id)
    }

    pub fn find_by_key(&self, key: EntityId) -> Option<&LineItem> {
        self.0.iter().find(|item| item.key == key)
    }

    pub(crate) fn find_by_key_mut(&mut self, key: EntityId) -> Option<&mut LineItem> {
        self.0.iter_mut().find(|item| item.key == key)
    }

    fn position(&self, id: LineItemId) -> WorkflowResult<usize> {
        self.0
            .iter()
            .position(|item| item.id == id)
            .ok_or(WorkflowError::ItemNotFound(id))
    }

    /// Fail if `key` is already used by a row other than `except`
    pub fn ensure_unique(&self, key: EntityId, except: Option<LineItemId>) -> WorkflowResult<()> {
        let clash = self
            .0
            .iter()
            .any(|item| item.key == key && Some(item.id) != except);
        if clash {
            return Err(WorkflowError::DuplicateItem { key });
        }
        Ok(())
    }

    /// Append a new manual row with a transient id
    pub fn add(&mut self, input: LineItemInput) -> WorkflowResult<&LineItem> {
        input.check()?;
        self.ensure_unique(input.key, None)?;
        self.push(LineItem::from_input(input)?);
        Ok(&self.0[self.0.len() - 1])
    }

    /// Append an already-built row, still subject to uniqueness
    pub fn insert(&mut self, item: LineItem) -> WorkflowResult<()> {
        self.ensure_unique(item.key, Some(item.id))?;
        self.push(item);
        Ok(())
    }

    pub(crate) fn push(&mut self, item: LineItem) {
        self.0.push(item);
    }

    pub fn edit(&mut self, id: LineItemId, input: LineItemInput) -> WorkflowResult<&LineItem> {
        let idx = self.position(id)?;
        input.check()?;
        self.ensure_unique(input.key, Some(id))?;
        self.0[idx].apply(input);
        Ok(&self.0[idx])
    }

    /// Remove a row; rows copied from a source order are locked
    pub fn remove(&mut self, id: LineItemId) -> WorkflowResult<LineItem> {
        let idx = self.position(id)?;
        if self.0[idx].is_locked() {
            return Err(WorkflowError::ItemLocked(id));
        }
        Ok(self.0.remove(idx))
    }

    pub(crate) fn remove_by_key(&mut self, key: EntityId) -> Option<LineItem> {
        let idx = self.0.iter().position(|item| item.key == key)?;
        Some(self.0.remove(idx))
    }

    /// Replace a row wholesale with the server's copy
    pub fn replace(&mut self, id: LineItemId, item: LineItem) -> WorkflowResult<()> {
        let idx = self.position(id)?;
        self.ensure_unique(item.key, Some(id))?;
        self.0[idx] = item;
        Ok(())
    }

    pub fn total(&self) -> Decimal {
        self.0.iter().map(LineItem::total_price).sum()
    }

    pub fn total_quantity(&self) -> u64 {
        self.0.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

impl TryFrom<Vec<LineItem>> for LineItems {
    type Error = WorkflowError;

    fn try_from(rows: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<LineItems> for Vec<LineItem> {
    fn from(items: LineItems) -> Self {
        items.0
    }
}

impl<'a> IntoIterator for &'a LineItems {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::line_item::ItemOrigin;
    use rust_decimal_macros::dec;

    fn input(key: EntityId, qty: u32) -> LineItemInput {
        LineItemInput::new(key, qty, dec!(4.00))
    }

    #[test]
    fn test_add_rejects_duplicate_key() {
        let mut items = LineItems::new();
        items.add(input(1, 2)).unwrap();
        let err = items.add(input(1, 5)).unwrap_err();
        assert_eq!(err, WorkflowError::DuplicateItem { key: 1 });
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_edit_may_keep_own_key_but_not_take_another() {
        let mut items = LineItems::new();
        let a = items.add(input(1, 1)).unwrap().id;
        items.add(input(2, 1)).unwrap();

        let edited = items.edit(a, input(1, 9)).unwrap();
        assert_eq!(edited.quantity, 9);

        let err = items.edit(a, input(2, 1)).unwrap_err();
        assert_eq!(err, WorkflowError::DuplicateItem { key: 2 });
        assert_eq!(items.get(a).unwrap().key, 1);
    }

    #[test]
    fn test_invalid_edit_leaves_row_untouched() {
        let mut items = LineItems::new();
        let a = items.add(input(1, 3)).unwrap().id;
        assert_eq!(items.edit(a, input(1, 0)), Err(WorkflowError::InvalidQuantity));
        assert_eq!(items.get(a).unwrap().quantity, 3);
    }

    #[test]
    fn test_locked_rows_cannot_be_removed() {
        let mut items = LineItems::new();
        let mut row = LineItem::from_input(input(5, 1)).unwrap();
        row.origin = ItemOrigin::OrderDerived { order_id: 10 };
        let id = row.id;
        items.insert(row).unwrap();

        assert_eq!(items.remove(id), Err(WorkflowError::ItemLocked(id)));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_totals() {
        let mut items = LineItems::new();
        items.add(input(1, 2)).unwrap();
        items.add(LineItemInput::new(2, 3, dec!(1.25))).unwrap();
        assert_eq!(items.total(), dec!(11.75));
        assert_eq!(items.total_quantity(), 5);
    }

    #[test]
    fn test_from_rows_rejects_duplicates() {
        let a = LineItem::from_input(input(1, 1)).unwrap();
        let b = LineItem::from_input(input(1, 2)).unwrap();
        assert!(LineItems::from_rows(vec![a, b]).is_err());
    }

    #[test]
    fn test_decoding_rejects_duplicate_keys() {
        let json = r#"[
            {"id": 1, "product_id": 2, "quantity": 1, "unit_price": 3},
            {"id": 2, "product_id": 2, "quantity": 4, "unit_price": 3}
        ]"#;
        let err = serde_json::from_str::<LineItems>(json).unwrap_err();
        assert!(err.to_string().contains("already exists"), "{}", err);
    }

    #[test]
    fn test_decoding_rejects_zero_quantity_and_negative_price() {
        let zero = r#"[{"id": 1, "product_id": 2, "quantity": 0, "unit_price": 3}]"#;
        assert!(serde_json::from_str::<LineItems>(zero).is_err());

        let negative = r#"[{"id": 1, "product_id": 2, "quantity": 1, "unit_price": -1}]"#;
        assert!(serde_json::from_str::<LineItems>(negative).is_err());
    }

    #[test]
    fn test_encoding_is_a_plain_array() {
        let mut items = LineItems::new();
        items.add(input(7, 2)).unwrap();
        let value = serde_json::to_value(&items).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        let back: LineItems = serde_json::from_value(value).unwrap();
        assert_eq!(back, items);
    }
}
