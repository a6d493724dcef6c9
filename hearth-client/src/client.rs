//! Client facade

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::UserInfo;
use shared::document::{
    CaptainOrderParties, CaptainOrderStatus, CashReceipt, CashReceiptParties, CashReceiptStatus,
    Document, OrderParties, PurchaseOrderStatus, PurchaseReceivable, ReceivableParties,
    ReceivableStatus, RequisitionParties, RequisitionStatus, WorkflowStatus,
};
use shared::models::MasterData;
use shared::types::{Actor, EntityId};

use crate::api::{AuthApi, CatalogApi, DocumentApi, NotificationApi, ReportApi};
use crate::config::ClientConfig;
use crate::editor::{DocumentEditor, ReceiptDraft};
use crate::error::{ClientError, ClientResult};
use crate::http::NetworkHttpClient;
use crate::notification::NotificationListener;
use crate::receipt::PrintService;
use crate::session::Session;

/// Entry point to the back-office API
#[derive(Debug, Clone)]
pub struct HearthClient {
    config: ClientConfig,
    http: NetworkHttpClient,
}

impl HearthClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = NetworkHttpClient::new(&config, Session::new())?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &NetworkHttpClient {
        &self.http
    }

    pub fn session(&self) -> &Session {
        self.http.session()
    }

    // ========== Auth ==========

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.http)
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserInfo> {
        self.auth().login(username, password).await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.auth().logout().await
    }

    fn actor(&self) -> ClientResult<Actor> {
        self.session().actor().ok_or(ClientError::Unauthorized)
    }

    // ========== Documents ==========

    pub fn documents<S, P>(&self) -> DocumentApi<'_, S, P>
    where
        S: WorkflowStatus,
        P: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        DocumentApi::new(&self.http)
    }

    pub fn purchase_orders(&self) -> DocumentApi<'_, PurchaseOrderStatus, OrderParties> {
        self.documents()
    }

    pub fn receivables(&self) -> DocumentApi<'_, ReceivableStatus, ReceivableParties> {
        self.documents()
    }

    pub fn captain_orders(&self) -> DocumentApi<'_, CaptainOrderStatus, CaptainOrderParties> {
        self.documents()
    }

    pub fn cash_receipts(&self) -> DocumentApi<'_, CashReceiptStatus, CashReceiptParties> {
        self.documents()
    }

    pub fn requisitions(&self) -> DocumentApi<'_, RequisitionStatus, RequisitionParties> {
        self.documents()
    }

    /// Editor for a document held in memory, acting as the logged-in user
    pub fn edit<S, P>(&self, doc: Document<S, P>) -> ClientResult<DocumentEditor<'_, S, P>>
    where
        S: WorkflowStatus,
        P: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        Ok(DocumentEditor::new(self.documents(), doc, self.actor()?))
    }

    /// Load a saved document for editing
    pub async fn open<S, P>(&self, id: EntityId) -> ClientResult<DocumentEditor<'_, S, P>>
    where
        S: WorkflowStatus,
        P: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let actor = self.actor()?;
        DocumentEditor::open(self.documents(), id, actor).await
    }

    /// Unsaved receivable pre-filled from a purchase order
    pub async fn receivable_from_order(
        &self,
        order_id: EntityId,
        number: impl Into<String>,
        date: NaiveDate,
    ) -> ClientResult<DocumentEditor<'_, ReceivableStatus, ReceivableParties>> {
        let actor = self.actor()?;
        let order = self.purchase_orders().get(order_id).await?;
        let receivable = PurchaseReceivable::from_order(&order, number, date, actor.user_id)?;
        Ok(DocumentEditor::new(self.documents(), receivable, actor))
    }

    /// Start a cash receipt assembled from captain orders
    pub fn receipt_draft(&self, number: impl Into<String>, date: NaiveDate) -> ClientResult<ReceiptDraft<'_>> {
        let actor = self.actor()?;
        let receipt = CashReceipt::new(number, date, actor.user_id, CashReceiptParties::default());
        Ok(ReceiptDraft::new(self.captain_orders(), self.cash_receipts(), receipt))
    }

    // ========== Master data, notifications, reports ==========

    pub fn catalog<T: MasterData>(&self) -> CatalogApi<'_, T> {
        CatalogApi::new(&self.http)
    }

    pub fn notifications(&self) -> NotificationApi<'_> {
        NotificationApi::new(&self.http)
    }

    pub fn reports(&self) -> ReportApi<'_> {
        ReportApi::new(&self.http)
    }

    /// Connect to the push channel configured in `notify_addr`
    pub async fn listen(&self) -> ClientResult<NotificationListener> {
        let addr = self
            .config
            .notify_addr
            .as_deref()
            .ok_or_else(|| ClientError::Config("no notification address configured".into()))?;
        let user_id = self.session().current_user().map(|u| u.id);
        NotificationListener::connect(addr, &self.config.notification, user_id).await
    }

    pub fn print_service(&self) -> ClientResult<PrintService> {
        PrintService::from_config(&self.config.printer, self.config.timeout_duration())
    }
}
