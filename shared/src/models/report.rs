//! Report Models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// One day of `GET /reports/sales`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReportRow {
    pub date: NaiveDate,
    /// Printed cash receipts that day
    pub receipt_count: u32,
    pub quantity: u64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(default)]
    pub rows: Vec<SalesReportRow>,
}

impl SalesReport {
    pub fn total_amount(&self) -> Decimal {
        self.rows.iter().map(|r| r.amount).sum()
    }

    pub fn total_receipts(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.receipt_count)).sum()
    }
}

/// One supplier of `GET /reports/purchases`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseReportRow {
    pub supplier_id: EntityId,
    pub supplier_name: String,
    /// Approved purchase orders in range
    pub order_count: u32,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(default)]
    pub rows: Vec<PurchaseReportRow>,
}

impl PurchaseReport {
    pub fn total_amount(&self) -> Decimal {
        self.rows.iter().map(|r| r.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_totals() {
        let json = r#"{"from":"2026-05-01","to":"2026-05-02","rows":[
            {"date":"2026-05-01","receipt_count":3,"quantity":10,"amount":120.5},
            {"date":"2026-05-02","receipt_count":2,"quantity":4,"amount":40}
        ]}"#;
        let report: SalesReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.total_amount(), Decimal::new(1605, 1));
        assert_eq!(report.total_receipts(), 5);
    }
}
