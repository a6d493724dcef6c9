//! hearth-client - back-office client for hotel and restaurant operations
//!
//! Wraps the Hearth REST API: approval-workflow documents (purchase orders,
//! receivables, captain orders, cash receipts, store requisitions), master
//! data, notifications and reports. Local checks mirror the server's rules so
//! a UI can disable what would be refused, but the server has the last word.
//!
//! ```no_run
//! use hearth_client::{ClientConfig, HearthClient};
//! use shared::document::{OrderParties, PurchaseOrderStatus, WorkflowAction};
//!
//! # async fn run() -> hearth_client::ClientResult<()> {
//! let client = HearthClient::new(ClientConfig::new("http://localhost:8080/api"))?;
//! client.login("maria", "secret").await?;
//!
//! let mut po = client.open::<PurchaseOrderStatus, OrderParties>(12).await?;
//! po.run(WorkflowAction::Check, None).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod http;
pub mod logger;
pub mod notification;
pub mod receipt;
pub mod session;

pub use client::HearthClient;
pub use config::{ClientConfig, NotificationConfig, PrinterConfig};
pub use editor::{DocumentEditor, ReceiptDraft};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use http::{HttpClient, NetworkHttpClient};
pub use notification::NotificationListener;
pub use receipt::{PrintService, TicketContext, TicketRenderer};
pub use session::{AuthState, Session};

// Re-export shared types for convenience
pub use shared::{self, ListQuery, PaginatedResponse};
