use shared::models::{PurchaseReport, SalesReport};
use shared::request::DateRange;

use crate::error::ClientResult;
use crate::http::{HttpClient, NetworkHttpClient};

pub struct ReportApi<'a, C = NetworkHttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> ReportApi<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// Daily receipt totals
    pub async fn sales(&self, range: DateRange) -> ClientResult<SalesReport> {
        self.http.get_query("reports/sales", &range.to_pairs()).await
    }

    /// Approved purchases per supplier
    pub async fn purchases(&self, range: DateRange) -> ClientResult<PurchaseReport> {
        self.http.get_query("reports/purchases", &range.to_pairs()).await
    }
}
