//! `hearth` - command line access to the back office
//!
//! Logs in with `HEARTH_USERNAME` / `HEARTH_PASSWORD` (or flags), runs one
//! command and logs out again.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use hearth_client::{ClientConfig, ClientError, HearthClient, TicketContext, logger};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::document::{
    CaptainOrderParties, CaptainOrderStatus, CashReceiptParties, CashReceiptStatus, Document,
    OrderParties, PurchaseOrderStatus, ReceivableParties, ReceivableStatus, RequisitionParties,
    RequisitionStatus, WorkflowStatus,
};
use shared::models::{MasterData, MenuItem, Product, Role, Room, Staff, Supplier, User};
use shared::request::DateRange;
use shared::types::EntityId;
use shared::{DocumentKind, ListQuery, WorkflowAction};
use std::path::Path;

#[derive(Parser)]
#[command(name = "hearth", about = "Hearth back-office client", version)]
struct Cli {
    #[arg(long, global = true, env = "HEARTH_API_URL", help = "API base URL")]
    api_url: Option<String>,
    #[arg(long, global = true, env = "HEARTH_USERNAME")]
    username: Option<String>,
    #[arg(long, global = true, env = "HEARTH_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(long, global = true, action = ArgAction::SetTrue, help = "Log as JSON lines")]
    json_logs: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the logged-in user
    Whoami,
    /// List documents of one kind
    List(ListArgs),
    /// Show one document with its rows
    Show(DocArgs),
    /// Run a workflow action (check, approve, reject, print, reopen, release)
    Act(ActArgs),
    /// Print a captain order or cash receipt, then mark it printed
    Print(DocArgs),
    /// List master data
    Catalog(CatalogArgs),
    /// List notifications, or follow the push channel
    Notifications(NotificationArgs),
    /// Sales or purchase report
    Report(ReportArgs),
}

#[derive(Args)]
struct ListArgs {
    #[arg(value_parser = parse_kind)]
    kind: DocumentKind,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args)]
struct DocArgs {
    #[arg(value_parser = parse_kind)]
    kind: DocumentKind,
    id: EntityId,
}

#[derive(Args)]
struct ActArgs {
    #[arg(value_parser = parse_kind)]
    kind: DocumentKind,
    id: EntityId,
    #[arg(value_parser = parse_action)]
    action: WorkflowAction,
    #[arg(long, help = "Required when rejecting")]
    reason: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CatalogKind {
    Products,
    Menus,
    Staff,
    Rooms,
    Suppliers,
    Users,
    Roles,
}

#[derive(Args)]
struct CatalogArgs {
    #[arg(value_enum)]
    kind: CatalogKind,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args)]
struct NotificationArgs {
    #[arg(long, action = ArgAction::SetTrue, help = "Stay connected and print pushed events")]
    follow: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportKind {
    Sales,
    Purchases,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(value_enum)]
    kind: ReportKind,
    #[arg(long)]
    from: NaiveDate,
    #[arg(long)]
    to: NaiveDate,
}

fn parse_kind(s: &str) -> Result<DocumentKind, String> {
    s.parse()
}

fn parse_action(s: &str) -> Result<WorkflowAction, String> {
    s.parse()
}

/// Run `$f::<Status, Parties>(args..)` for a runtime document kind
macro_rules! for_kind {
    ($kind:expr, $f:ident($($arg:expr),*)) => {
        match $kind {
            DocumentKind::PurchaseOrder => $f::<PurchaseOrderStatus, OrderParties>($($arg),*).await,
            DocumentKind::PurchaseReceivable => $f::<ReceivableStatus, ReceivableParties>($($arg),*).await,
            DocumentKind::CaptainOrder => $f::<CaptainOrderStatus, CaptainOrderParties>($($arg),*).await,
            DocumentKind::CashReceipt => $f::<CashReceiptStatus, CashReceiptParties>($($arg),*).await,
            DocumentKind::StoreRequisition => $f::<RequisitionStatus, RequisitionParties>($($arg),*).await,
        }
    };
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config.base_url = url.clone();
    }
    logger::init_logger_with_file(
        &config.log_level,
        cli.json_logs,
        config.log_dir.as_deref().map(Path::new),
    )?;

    let client = HearthClient::new(config)?;
    let username = cli.username.as_deref().context("missing --username / HEARTH_USERNAME")?;
    let password = cli.password.as_deref().context("missing --password / HEARTH_PASSWORD")?;
    client.login(username, password).await.context("login failed")?;

    let result = run(&client, cli.command, cli.json).await;
    if let Err(e) = client.logout().await {
        tracing::debug!(error = %e, "logout failed");
    }
    if let Err(e) = &result {
        report(e);
    }
    result
}

async fn run(client: &HearthClient, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Whoami => {
            let user = client.auth().me().await?;
            if json {
                print_json(&user)?;
            } else {
                println!("{} ({}) #{}", user.display_name(), user.role, user.id);
                for permission in &user.permissions {
                    println!("  {}", permission);
                }
            }
        }
        Commands::List(args) => {
            let mut query = ListQuery::page(args.page).with_limit(client.config().page_size);
            if let Some(search) = args.search {
                query = query.with_search(search);
            }
            for_kind!(args.kind, list_documents(client, &query, json))?;
        }
        Commands::Show(args) => for_kind!(args.kind, show_document(client, args.id, json))?,
        Commands::Act(args) => {
            for_kind!(args.kind, act(client, args.id, args.action, args.reason.as_deref(), json))?
        }
        Commands::Print(args) => print_document(client, args.kind, args.id).await?,
        Commands::Catalog(args) => {
            let mut query = ListQuery::page(args.page).with_limit(client.config().page_size);
            if let Some(search) = args.search {
                query = query.with_search(search);
            }
            match args.kind {
                CatalogKind::Products => list_catalog::<Product>(client, &query).await?,
                CatalogKind::Menus => list_catalog::<MenuItem>(client, &query).await?,
                CatalogKind::Staff => list_catalog::<Staff>(client, &query).await?,
                CatalogKind::Rooms => list_catalog::<Room>(client, &query).await?,
                CatalogKind::Suppliers => list_catalog::<Supplier>(client, &query).await?,
                CatalogKind::Users => list_catalog::<User>(client, &query).await?,
                CatalogKind::Roles => list_catalog::<Role>(client, &query).await?,
            }
        }
        Commands::Notifications(args) => notifications(client, args.follow, json).await?,
        Commands::Report(args) => {
            let range = DateRange::new(args.from, args.to);
            match args.kind {
                ReportKind::Sales => {
                    let report = client.reports().sales(range).await?;
                    if json {
                        print_json(&report)?;
                    } else {
                        for row in &report.rows {
                            println!("{}  {:>4} receipts  {:>12.2}", row.date, row.receipt_count, row.amount);
                        }
                        println!("total {:.2} from {} receipts", report.total_amount(), report.total_receipts());
                    }
                }
                ReportKind::Purchases => {
                    let report = client.reports().purchases(range).await?;
                    if json {
                        print_json(&report)?;
                    } else {
                        for row in &report.rows {
                            println!("{:<30} {:>4} orders  {:>12.2}", row.supplier_name, row.order_count, row.amount);
                        }
                        println!("total {:.2}", report.total_amount());
                    }
                }
            }
        }
    }
    Ok(())
}

fn summary<S: WorkflowStatus, P>(doc: &Document<S, P>) -> String {
    format!(
        "{:>6}  {:<14} {}  {:<10} {:>4} rows  {:>10.2}",
        doc.id.map(|id| id.to_string()).unwrap_or_default(),
        doc.number,
        doc.date,
        doc.status,
        doc.items.len(),
        doc.total()
    )
}

async fn list_documents<S, P>(client: &HearthClient, query: &ListQuery, json: bool) -> Result<()>
where
    S: WorkflowStatus,
    P: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let page = client.documents::<S, P>().list(query).await?;
    if json {
        return print_json(&page);
    }
    for doc in &page.data {
        println!("{}", summary(doc));
    }
    println!("page {}/{} ({} total)", page.page, page.total_pages.max(1), page.total);
    Ok(())
}

async fn show_document<S, P>(client: &HearthClient, id: EntityId, json: bool) -> Result<()>
where
    S: WorkflowStatus,
    P: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let editor = client.open::<S, P>(id).await?;
    let doc = editor.document();
    if json {
        return print_json(doc);
    }
    println!("{} {}", S::KIND, summary(doc));
    if let Some(reason) = &doc.rejection_reason {
        println!("rejected: {}", reason);
    }
    for item in &doc.items {
        println!(
            "  {:<8} {:<30} {:>5} x {:>10.2} = {:>10.2}",
            item.id,
            item.name.as_deref().unwrap_or("-"),
            item.quantity,
            item.unit_price,
            item.total_price()
        );
    }
    let actions: Vec<&str> = editor.available_actions().iter().map(|a| a.as_str()).collect();
    if doc.status.is_terminal() {
        println!("editable: {}  closed", editor.can_edit_items());
    } else {
        println!("editable: {}  actions: {}", editor.can_edit_items(), actions.join(", "));
    }
    Ok(())
}

async fn act<S, P>(
    client: &HearthClient,
    id: EntityId,
    action: WorkflowAction,
    reason: Option<&str>,
    json: bool,
) -> Result<()>
where
    S: WorkflowStatus,
    P: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let mut editor = client.open::<S, P>(id).await?;
    let doc = editor.run(action, reason).await?;
    if json {
        return print_json(doc);
    }
    println!("{} {} -> {}", doc.number, action, doc.status);
    Ok(())
}

async fn print_document(client: &HearthClient, kind: DocumentKind, id: EntityId) -> Result<()> {
    let service = client.print_service()?;
    let user = client.session().current_user();
    let mut ctx = TicketContext::new("Hearth");
    ctx.waiter = user.as_ref().map(|u| u.display_name().to_string());

    match kind {
        DocumentKind::CaptainOrder => {
            let mut editor = client.open::<CaptainOrderStatus, CaptainOrderParties>(id).await?;
            service.print_captain_order(&mut editor, &ctx).await?;
            println!("{} printed", editor.document().number);
        }
        DocumentKind::CashReceipt => {
            let mut editor = client.open::<CashReceiptStatus, CashReceiptParties>(id).await?;
            service.print_cash_receipt(&mut editor, &ctx).await?;
            println!("{} printed", editor.document().number);
        }
        other => anyhow::bail!("{} cannot be printed", other),
    }
    Ok(())
}

async fn list_catalog<T: MasterData + Serialize>(client: &HearthClient, query: &ListQuery) -> Result<()> {
    let page = client.catalog::<T>().list(query).await?;
    print_json(&page.data)
}

async fn notifications(client: &HearthClient, follow: bool, json: bool) -> Result<()> {
    if !follow {
        let page = client.notifications().list(&ListQuery::default()).await?;
        if json {
            return print_json(&page);
        }
        for n in &page.data {
            let mark = if n.is_read { ' ' } else { '*' };
            println!("{} {:>5} [{}] {}: {}", mark, n.id, n.level, n.title, n.message);
        }
        return Ok(());
    }

    let listener = client.listen().await?;
    let mut rx = listener.subscribe();
    let mut alive = tokio::time::interval(std::time::Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = alive.tick() => {
                if !listener.is_running() {
                    eprintln!("notification channel closed");
                    break;
                }
            }
            event = rx.recv() => match event {
                Ok(event) => println!("[{}] {}: {}", event.level, event.title, event.message),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notifications dropped");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    listener.close().await;
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(err: &anyhow::Error) {
    let Some(client_err) = err.downcast_ref::<ClientError>() else {
        return;
    };
    tracing::debug!(kind = ?client_err.kind(), "command failed");
    for (field, message) in client_err.field_errors() {
        eprintln!("  {}: {}", field, message);
    }
}
