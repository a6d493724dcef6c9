//! Server-confirmed editing of one document
//!
//! Every change is checked locally first (editable status, unique key,
//! positive quantity, gate rules) so obviously bad requests never leave the
//! client. Once a document is saved, the local copy only changes after the
//! server accepted the request; a rejection leaves it untouched.

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::document::{
    CaptainOrderParties, CaptainOrderStatus, CashReceipt, CashReceiptParties, CashReceiptStatus,
    Document, LineItem, LineItemId, LineItemInput, ReceiptBuilder, RejectReason, WorkflowAction,
    WorkflowStatus,
};
use shared::types::{Actor, EntityId};
use shared::WorkflowError;

use crate::api::DocumentApi;
use crate::error::ClientResult;
use crate::http::{HttpClient, NetworkHttpClient};

pub struct DocumentEditor<'a, S, P, C = NetworkHttpClient> {
    api: DocumentApi<'a, S, P, C>,
    doc: Document<S, P>,
    actor: Actor,
}

impl<'a, S, P, C> DocumentEditor<'a, S, P, C>
where
    S: WorkflowStatus,
    P: Serialize + DeserializeOwned + Send + Sync + 'static,
    C: HttpClient,
{
    /// Edit a document held in memory (new drafts included)
    pub fn new(api: DocumentApi<'a, S, P, C>, doc: Document<S, P>, actor: Actor) -> Self {
        Self { api, doc, actor }
    }

    /// Load a saved document from the server
    pub async fn open(api: DocumentApi<'a, S, P, C>, id: EntityId, actor: Actor) -> ClientResult<Self> {
        let doc = api.get(id).await?;
        Ok(Self { api, doc, actor })
    }

    pub fn document(&self) -> &Document<S, P> {
        &self.doc
    }

    pub fn into_document(self) -> Document<S, P> {
        self.doc
    }

    pub fn is_saved(&self) -> bool {
        self.doc.id.is_some()
    }

    pub fn can_edit_items(&self) -> bool {
        self.doc.can_edit_items()
    }

    /// Actions the current user may offer in the UI
    pub fn available_actions(&self) -> Vec<WorkflowAction> {
        self.doc.available_actions(&self.actor)
    }

    /// Gate check for `action` without contacting the server
    pub fn check(&self, action: WorkflowAction, reason: Option<&str>) -> ClientResult<()> {
        self.doc.check_action(action, &self.actor, reason)?;
        Ok(())
    }

    /// Create or update on the server, adopting the server's copy
    pub async fn save(&mut self) -> ClientResult<&Document<S, P>> {
        let saved = match self.doc.id {
            None => self.api.create(&self.doc).await?,
            Some(_) => self.api.update(&self.doc).await?,
        };
        tracing::info!(kind = %S::KIND, id = ?saved.id, number = %saved.number, "document saved");
        self.doc = saved;
        Ok(&self.doc)
    }

    /// Discard local state and reload from the server
    pub async fn reload(&mut self) -> ClientResult<()> {
        if let Some(id) = self.doc.id {
            self.doc = self.api.get(id).await?;
        }
        Ok(())
    }

    pub async fn add_item(&mut self, input: LineItemInput) -> ClientResult<&LineItem> {
        let Some(doc_id) = self.doc.id else {
            return Ok(self.doc.add_item(input)?);
        };
        self.doc.ensure_editable()?;
        input.check()?;
        self.doc.items.ensure_unique(input.key, None)?;

        let row = self.api.add_item(doc_id, &input).await?;
        let id = row.id;
        self.doc.items.insert(row)?;
        self.doc.items.get(id).ok_or_else(|| WorkflowError::ItemNotFound(id).into())
    }

    pub async fn edit_item(&mut self, id: LineItemId, input: LineItemInput) -> ClientResult<&LineItem> {
        let (Some(doc_id), LineItemId::Persisted(item_id)) = (self.doc.id, id) else {
            return Ok(self.doc.edit_item(id, input)?);
        };
        self.doc.ensure_editable()?;
        if self.doc.items.get(id).is_none() {
            return Err(WorkflowError::ItemNotFound(id).into());
        }
        input.check()?;
        self.doc.items.ensure_unique(input.key, Some(id))?;

        let row = self.api.update_item(doc_id, item_id, &input).await?;
        let new_id = row.id;
        self.doc.items.replace(id, row)?;
        self.doc.items.get(new_id).ok_or_else(|| WorkflowError::ItemNotFound(new_id).into())
    }

    pub async fn remove_item(&mut self, id: LineItemId) -> ClientResult<LineItem> {
        let (Some(doc_id), LineItemId::Persisted(item_id)) = (self.doc.id, id) else {
            return Ok(self.doc.remove_item(id)?);
        };
        self.doc.ensure_editable()?;
        match self.doc.items.get(id) {
            None => return Err(WorkflowError::ItemNotFound(id).into()),
            Some(row) if row.is_locked() => return Err(WorkflowError::ItemLocked(id).into()),
            Some(_) => {}
        }

        self.api.delete_item(doc_id, item_id).await?;
        Ok(self.doc.items.remove(id)?)
    }

    /// Run a workflow action through the server
    ///
    /// The gate is checked locally first; on success the server's copy of
    /// the document replaces the local one.
    #[tracing::instrument(skip(self, reason), fields(kind = %S::KIND, id = ?self.doc.id))]
    pub async fn run(&mut self, action: WorkflowAction, reason: Option<&str>) -> ClientResult<&Document<S, P>> {
        let doc_id = self
            .doc
            .id
            .ok_or_else(|| WorkflowError::Validation("save the document first".into()))?;
        let transition = self.doc.check_action(action, &self.actor, reason)?;
        let reason = transition.reason.clone().map(|reason| RejectReason { reason });

        let updated = self.api.action(doc_id, action, reason).await?;
        if updated.status != transition.to {
            tracing::warn!(expected = %transition.to, got = %updated.status, "server moved document elsewhere");
        }
        crate::audit_log!(
            self.actor.user_id,
            action.as_str(),
            format!("{}:{}", S::KIND.permission_scope(), doc_id)
        );
        self.doc = updated;
        Ok(&self.doc)
    }
}

/// A cash receipt assembled from saved captain orders
pub struct ReceiptDraft<'a, C = NetworkHttpClient> {
    captain_orders: DocumentApi<'a, CaptainOrderStatus, CaptainOrderParties, C>,
    receipts: DocumentApi<'a, CashReceiptStatus, CashReceiptParties, C>,
    builder: ReceiptBuilder,
}

impl<'a, C: HttpClient> ReceiptDraft<'a, C> {
    pub fn new(
        captain_orders: DocumentApi<'a, CaptainOrderStatus, CaptainOrderParties, C>,
        receipts: DocumentApi<'a, CashReceiptStatus, CashReceiptParties, C>,
        receipt: CashReceipt,
    ) -> Self {
        Self {
            captain_orders,
            receipts,
            builder: ReceiptBuilder::new(receipt),
        }
    }

    pub fn receipt(&self) -> &CashReceipt {
        self.builder.receipt()
    }

    /// Fetch a captain order and add its rows
    pub async fn select(&mut self, order_id: EntityId) -> ClientResult<()> {
        let order = self.captain_orders.get(order_id).await?;
        self.builder.select(&order)?;
        Ok(())
    }

    pub fn deselect(&mut self, order_id: EntityId) -> ClientResult<()> {
        Ok(self.builder.deselect(order_id)?)
    }

    pub fn remove_item(&mut self, id: LineItemId) -> ClientResult<LineItem> {
        Ok(self.builder.remove_item(id)?)
    }

    /// Persist the receipt and hand back the server's copy
    pub async fn save(self) -> ClientResult<CashReceipt> {
        let receipt = self.builder.finish();
        let saved = self.receipts.create(&receipt).await?;
        tracing::info!(id = ?saved.id, orders = ?saved.parties.captain_order_ids, "cash receipt saved");
        Ok(saved)
    }
}
