//! Kitchen tickets and cash receipts
//!
//! Layout lives here; ESC/POS encoding and transport live in
//! `hearth-printer`. A document is only marked printed after the printer
//! took the bytes.

use hearth_printer::{CodePage, Columns, NetworkPrinter, Printer, TicketBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::document::{
    CaptainOrder, CaptainOrderParties, CaptainOrderStatus, CashReceipt, CashReceiptParties,
    CashReceiptStatus, LineItem, WorkflowAction, WorkflowStatus,
};
use shared::types::EntityId;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::PrinterConfig;
use crate::editor::DocumentEditor;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;

/// Names the documents only reference by id
#[derive(Debug, Clone, Default)]
pub struct TicketContext {
    /// Printed at the top of receipts
    pub venue: String,
    pub waiter: Option<String>,
    pub room: Option<String>,
    /// Menu id to printed name, used when a row carries no name
    pub item_names: HashMap<EntityId, String>,
}

impl TicketContext {
    pub fn new(venue: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
            ..Self::default()
        }
    }

    fn item_name(&self, item: &LineItem) -> String {
        item.name
            .clone()
            .or_else(|| self.item_names.get(&item.key).cloned())
            .unwrap_or_else(|| format!("#{}", item.key))
    }
}

/// Lays out tickets for one paper width and code page
#[derive(Debug, Clone, Copy)]
pub struct TicketRenderer {
    width: usize,
    code_page: CodePage,
}

impl TicketRenderer {
    pub fn new(width: usize, code_page: CodePage) -> Self {
        Self { width, code_page }
    }

    /// Kitchen copy: big table header, quantities first, no prices
    pub fn kitchen_ticket(&self, order: &CaptainOrder, ctx: &TicketContext) -> TicketBuilder {
        let mut b = TicketBuilder::new(self.width, self.code_page);

        let table = order.parties.table_number.as_deref().or(ctx.room.as_deref());
        b.center().double_size().bold(true);
        b.line(table.unwrap_or("KITCHEN"));
        b.bold(false).normal_size();
        b.line(&order.number);
        b.left().sep_double();

        if let Some(waiter) = &ctx.waiter {
            b.line_lr("Waiter", waiter);
        }
        if let Some(guests) = order.parties.guest_count {
            b.line_lr("Guests", &guests.to_string());
        }
        b.line_lr("Date", &order.date.format("%Y-%m-%d").to_string());
        b.sep_single();

        b.double_height();
        for item in &order.items {
            b.line(&format!("{:>3} x {}", item.quantity, ctx.item_name(item)));
            if let Some(remark) = &item.remark {
                b.normal_size().line(&format!("      * {}", remark)).double_height();
            }
        }
        b.normal_size().sep_double();
        if let Some(remark) = &order.remark {
            b.line(remark);
        }
        b.cut(3);
        b
    }

    /// Guest copy with prices and total, opens the cash drawer
    pub fn cash_receipt(&self, receipt: &CashReceipt, ctx: &TicketContext) -> TicketBuilder {
        let mut b = TicketBuilder::new(self.width, self.code_page);
        let cols = Columns::for_width(self.width);

        b.double_size().title(&ctx.venue).normal_size();
        b.title(&format!("Receipt {}", receipt.number));
        b.sep_double();
        b.line_lr("Date", &receipt.date.format("%Y-%m-%d").to_string());
        if let Some(guest) = &receipt.parties.guest_name {
            b.line_lr("Guest", guest);
        }
        if let Some(waiter) = &ctx.waiter {
            b.line_lr("Waiter", waiter);
        }
        b.sep_single();

        b.bold(true).item_row("Item", "Qty", "Amount", cols).bold(false);
        for item in &receipt.items {
            b.item_row(
                &ctx.item_name(item),
                &item.quantity.to_string(),
                &format!("{:.2}", item.total_price()),
                cols,
            );
        }
        b.sep_single();
        b.line_lr("Items", &receipt.items.total_quantity().to_string());
        b.bold(true)
            .line_lr("TOTAL", &format!("{:.2}", receipt.total()))
            .bold(false);
        b.sep_double();
        b.title("Thank you");
        b.cut(4).open_drawer();
        b
    }
}

/// Prints documents and records the print on the server
pub struct PrintService<P = NetworkPrinter> {
    printer: P,
    renderer: TicketRenderer,
}

impl PrintService<NetworkPrinter> {
    pub fn from_config(config: &PrinterConfig, timeout: Duration) -> ClientResult<Self> {
        let addr = config
            .addr
            .as_deref()
            .ok_or_else(|| ClientError::Config("no printer address configured".into()))?;
        let printer = NetworkPrinter::from_addr(addr)?.with_timeout(timeout);
        Ok(Self::new(
            printer,
            TicketRenderer::new(config.paper_width, config.code_page),
        ))
    }
}

impl<P: Printer> PrintService<P> {
    pub fn new(printer: P, renderer: TicketRenderer) -> Self {
        Self { printer, renderer }
    }

    pub fn renderer(&self) -> &TicketRenderer {
        &self.renderer
    }

    pub async fn print_captain_order<C: HttpClient>(
        &self,
        editor: &mut DocumentEditor<'_, CaptainOrderStatus, CaptainOrderParties, C>,
        ctx: &TicketContext,
    ) -> ClientResult<()> {
        let ticket = self.renderer.kitchen_ticket(editor.document(), ctx);
        self.print_then_mark(editor, ticket).await
    }

    pub async fn print_cash_receipt<C: HttpClient>(
        &self,
        editor: &mut DocumentEditor<'_, CashReceiptStatus, CashReceiptParties, C>,
        ctx: &TicketContext,
    ) -> ClientResult<()> {
        let ticket = self.renderer.cash_receipt(editor.document(), ctx);
        self.print_then_mark(editor, ticket).await
    }

    /// Nothing is sent when the gate refuses `print`; the transition only
    /// runs after the printer accepted the job
    #[tracing::instrument(skip_all, fields(kind = %S::KIND, number = %editor.document().number))]
    async fn print_then_mark<S, Pa, C>(
        &self,
        editor: &mut DocumentEditor<'_, S, Pa, C>,
        ticket: TicketBuilder,
    ) -> ClientResult<()>
    where
        S: WorkflowStatus,
        Pa: Serialize + DeserializeOwned + Send + Sync + 'static,
        C: HttpClient,
    {
        editor.check(WorkflowAction::Print, None)?;

        if let Err(e) = self.printer.print(&ticket.build()).await {
            tracing::warn!(error = %e, "print failed, document left unchanged");
            return Err(e.into());
        }
        editor.run(WorkflowAction::Print, None).await?;
        Ok(())
    }
}
