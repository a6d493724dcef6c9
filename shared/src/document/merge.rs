//! Building documents from other documents
//!
//! Two flavours: a receivable copies its purchase order's rows verbatim, a
//! cash receipt sums the rows of every selected captain order by menu.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::error::{WorkflowError, WorkflowResult};
use super::header::{CaptainOrder, CashReceipt, PurchaseOrder, PurchaseReceivable, ReceivableParties};
use super::items::LineItems;
use super::line_item::{ItemOrigin, LineItem, LineItemId};
use crate::types::EntityId;

/// Copy rows of a saved order, tagging each with its source
pub fn derive_items(source: &LineItems, order_id: EntityId) -> LineItems {
    let mut items = LineItems::new();
    for row in source {
        items.push(LineItem {
            id: LineItemId::transient(),
            origin: ItemOrigin::OrderDerived { order_id },
            ..row.clone()
        });
    }
    items
}

impl PurchaseReceivable {
    /// New receivable pre-filled with the order's supplier and rows
    pub fn from_order(
        order: &PurchaseOrder,
        number: impl Into<String>,
        date: NaiveDate,
        created_by: EntityId,
    ) -> WorkflowResult<Self> {
        let order_id = order
            .id
            .ok_or_else(|| WorkflowError::Validation("source order has not been saved".into()))?;
        let mut receivable = Self::new(
            number,
            date,
            created_by,
            ReceivableParties {
                supplier_id: order.parties.supplier_id,
                order_id: Some(order_id),
                invoice_number: None,
            },
        );
        receivable.items = derive_items(&order.items, order_id);
        Ok(receivable)
    }
}

/// Quantity one source added under one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Contribution {
    key: EntityId,
    quantity: u32,
}

/// Tracks what each selected source contributed to a merged item list
///
/// Selecting adds a source's quantities to the rows with the same key
/// (creating rows as needed). Deselecting subtracts exactly what that
/// source added and drops rows that fall to zero.
#[derive(Debug, Clone, Default)]
pub struct ItemAggregator {
    order: Vec<EntityId>,
    contributions: HashMap<EntityId, Vec<Contribution>>,
}

impl ItemAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, source_id: EntityId) -> bool {
        self.contributions.contains_key(&source_id)
    }

    /// Selected source ids in selection order
    pub fn selected(&self) -> &[EntityId] {
        &self.order
    }

    pub fn select(
        &mut self,
        items: &mut LineItems,
        source_id: EntityId,
        source: &LineItems,
    ) -> WorkflowResult<()> {
        if self.is_selected(source_id) {
            return Err(WorkflowError::SourceAlreadySelected(source_id));
        }
        // all-or-nothing: refuse before touching any row
        for row in source {
            let current = items.find_by_key(row.key).map_or(0, |existing| existing.quantity);
            if current.checked_add(row.quantity).is_none() {
                return Err(WorkflowError::Validation(format!(
                    "quantity for {} would overflow",
                    row.key
                )));
            }
        }

        let mut added = Vec::with_capacity(source.len());
        for row in source {
            match items.find_by_key_mut(row.key) {
                Some(existing) => existing.quantity += row.quantity,
                None => {
                    // a fresh row owes nothing to sources selected earlier
                    self.forget(row.key);
                    items.push(LineItem {
                        id: LineItemId::transient(),
                        key: row.key,
                        name: row.name.clone(),
                        quantity: row.quantity,
                        unit_price: row.unit_price,
                        remark: None,
                        origin: ItemOrigin::Aggregated,
                    });
                }
            }
            added.push(Contribution {
                key: row.key,
                quantity: row.quantity,
            });
        }

        tracing::debug!(source_id, rows = added.len(), "source selected");
        self.order.push(source_id);
        self.contributions.insert(source_id, added);
        Ok(())
    }

    /// Drop every source's share in `key`, after its row was removed by hand
    pub fn forget(&mut self, key: EntityId) {
        for added in self.contributions.values_mut() {
            added.retain(|c| c.key != key);
        }
    }

    pub fn deselect(&mut self, items: &mut LineItems, source_id: EntityId) -> WorkflowResult<()> {
        let added = self
            .contributions
            .remove(&source_id)
            .ok_or(WorkflowError::SourceNotSelected(source_id))?;
        self.order.retain(|id| *id != source_id);

        for contribution in added {
            let Some(row) = items.find_by_key_mut(contribution.key) else {
                continue;
            };
            let remaining = i64::from(row.quantity) - i64::from(contribution.quantity);
            if remaining <= 0 {
                tracing::debug!(source_id, key = contribution.key, "merged row dropped");
                items.remove_by_key(contribution.key);
            } else {
                row.quantity = remaining as u32;
            }
        }
        Ok(())
    }
}

/// A cash receipt being assembled from captain orders
#[derive(Debug, Clone)]
pub struct ReceiptBuilder {
    receipt: CashReceipt,
    aggregator: ItemAggregator,
}

impl ReceiptBuilder {
    pub fn new(receipt: CashReceipt) -> Self {
        Self {
            receipt,
            aggregator: ItemAggregator::new(),
        }
    }

    pub fn receipt(&self) -> &CashReceipt {
        &self.receipt
    }

    pub fn selected(&self) -> &[EntityId] {
        self.aggregator.selected()
    }

    pub fn select(&mut self, order: &CaptainOrder) -> WorkflowResult<()> {
        self.receipt.ensure_editable()?;
        let order_id = order
            .id
            .ok_or_else(|| WorkflowError::Validation("captain order has not been saved".into()))?;
        self.aggregator
            .select(&mut self.receipt.items, order_id, &order.items)?;
        self.receipt.parties.captain_order_ids = self.aggregator.selected().to_vec();
        Ok(())
    }

    pub fn deselect(&mut self, order_id: EntityId) -> WorkflowResult<()> {
        self.receipt.ensure_editable()?;
        self.aggregator.deselect(&mut self.receipt.items, order_id)?;
        self.receipt.parties.captain_order_ids = self.aggregator.selected().to_vec();
        Ok(())
    }

    /// Remove a row by hand; the selected orders no longer count towards it
    pub fn remove_item(&mut self, id: LineItemId) -> WorkflowResult<LineItem> {
        let removed = self.receipt.remove_item(id)?;
        self.aggregator.forget(removed.key);
        Ok(removed)
    }

    pub fn finish(self) -> CashReceipt {
        self.receipt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::header::{CaptainOrderParties, CashReceiptParties, OrderParties};
    use crate::document::line_item::LineItemInput;
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    fn captain(id: EntityId, rows: &[(EntityId, u32)]) -> CaptainOrder {
        let mut order = CaptainOrder::new(
            format!("CO-{}", id),
            day(),
            1,
            CaptainOrderParties {
                waiter_id: 1,
                room_id: None,
                table_number: Some("T4".into()),
                guest_count: None,
            },
        );
        order.id = Some(id);
        for (menu, qty) in rows {
            order
                .add_item(LineItemInput::new(*menu, *qty, dec!(6.50)))
                .unwrap();
        }
        order
    }

    fn builder() -> ReceiptBuilder {
        ReceiptBuilder::new(CashReceipt::new("CR-1", day(), 1, CashReceiptParties::default()))
    }

    fn qty(receipt: &CashReceipt, key: EntityId) -> Option<u32> {
        receipt.items.find_by_key(key).map(|row| row.quantity)
    }

    #[test]
    fn test_merge_sums_by_menu_and_deselect_subtracts() {
        let a = captain(1, &[(100, 2)]);
        let b = captain(2, &[(100, 3)]);
        let mut builder = builder();

        builder.select(&a).unwrap();
        builder.select(&b).unwrap();
        assert_eq!(builder.receipt().items.len(), 1);
        assert_eq!(qty(builder.receipt(), 100), Some(5));
        assert_eq!(builder.receipt().parties.captain_order_ids, vec![1, 2]);

        builder.deselect(2).unwrap();
        assert_eq!(qty(builder.receipt(), 100), Some(2));
        assert_eq!(builder.receipt().parties.captain_order_ids, vec![1]);
    }

    #[test]
    fn test_deselect_drops_rows_that_reach_zero() {
        let a = captain(1, &[(100, 2), (200, 1)]);
        let b = captain(2, &[(100, 1)]);
        let mut builder = builder();
        builder.select(&a).unwrap();
        builder.select(&b).unwrap();

        builder.deselect(1).unwrap();
        assert_eq!(qty(builder.receipt(), 100), Some(1));
        assert_eq!(qty(builder.receipt(), 200), None);
    }

    #[test]
    fn test_double_select_is_rejected() {
        let a = captain(1, &[(100, 2)]);
        let mut builder = builder();
        builder.select(&a).unwrap();
        assert_eq!(
            builder.select(&a),
            Err(WorkflowError::SourceAlreadySelected(1))
        );
        assert_eq!(qty(builder.receipt(), 100), Some(2));
        assert_eq!(builder.deselect(9), Err(WorkflowError::SourceNotSelected(9)));
    }

    #[test]
    fn test_manual_row_with_same_key_keeps_its_own_quantity() {
        let mut receipt = CashReceipt::new("CR-2", day(), 1, CashReceiptParties::default());
        receipt.add_item(LineItemInput::new(100, 4, dec!(6.50))).unwrap();
        let mut builder = ReceiptBuilder::new(receipt);

        builder.select(&captain(1, &[(100, 3)])).unwrap();
        assert_eq!(qty(builder.receipt(), 100), Some(7));
        builder.deselect(1).unwrap();
        assert_eq!(qty(builder.receipt(), 100), Some(4));
    }

    #[test]
    fn test_removed_row_is_not_charged_to_earlier_sources() {
        let mut builder = builder();
        builder.select(&captain(1, &[(100, 2)])).unwrap();
        builder.select(&captain(2, &[(100, 3)])).unwrap();
        let row = builder.receipt().items.find_by_key(100).unwrap().id;
        builder.remove_item(row).unwrap();

        builder.select(&captain(3, &[(100, 4)])).unwrap();
        assert_eq!(qty(builder.receipt(), 100), Some(4));
        builder.deselect(1).unwrap();
        builder.deselect(2).unwrap();
        assert_eq!(qty(builder.receipt(), 100), Some(4));
        builder.deselect(3).unwrap();
        assert_eq!(qty(builder.receipt(), 100), None);
    }

    #[test]
    fn test_aggregator_forgets_rows_dropped_outside_it() {
        let mut items = LineItems::new();
        let mut aggregator = ItemAggregator::new();
        aggregator
            .select(&mut items, 1, &captain(1, &[(100, 2)]).items)
            .unwrap();
        items.remove_by_key(100);

        aggregator
            .select(&mut items, 2, &captain(2, &[(100, 4)]).items)
            .unwrap();
        aggregator.deselect(&mut items, 1).unwrap();
        assert_eq!(items.find_by_key(100).map(|row| row.quantity), Some(4));
    }

    #[test]
    fn test_overflowing_select_changes_nothing() {
        let mut builder = builder();
        builder.select(&captain(1, &[(200, 1), (100, u32::MAX)])).unwrap();

        let err = builder.select(&captain(2, &[(200, 5), (100, 1)])).unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(qty(builder.receipt(), 200), Some(1));
        assert_eq!(qty(builder.receipt(), 100), Some(u32::MAX));
        assert_eq!(builder.selected(), &[1]);
    }

    #[test]
    fn test_receivable_copies_order_rows_verbatim() {
        let mut order = PurchaseOrder::new(
            "PO-9",
            day(),
            1,
            OrderParties {
                supplier_id: 3,
                department_id: None,
                expected_date: None,
            },
        );
        order
            .add_item(LineItemInput::new(11, 10, dec!(1.20)).with_remark("cold chain"))
            .unwrap();
        order.id = Some(55);

        let receivable = PurchaseReceivable::from_order(&order, "GRV-1", day(), 2).unwrap();
        assert_eq!(receivable.parties.order_id, Some(55));
        assert_eq!(receivable.parties.supplier_id, 3);

        let row = receivable.items.find_by_key(11).unwrap();
        assert_eq!(row.quantity, 10);
        assert_eq!(row.unit_price, dec!(1.20));
        assert_eq!(row.remark.as_deref(), Some("cold chain"));
        assert_eq!(row.origin, ItemOrigin::OrderDerived { order_id: 55 });
        assert!(row.is_locked());
    }

    #[test]
    fn test_unsaved_order_cannot_seed_receivable() {
        let order = PurchaseOrder::new(
            "PO-10",
            day(),
            1,
            OrderParties {
                supplier_id: 3,
                department_id: None,
                expected_date: None,
            },
        );
        assert!(PurchaseReceivable::from_order(&order, "GRV-2", day(), 2).is_err());
    }
}
