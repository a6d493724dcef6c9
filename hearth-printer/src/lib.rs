//! # hearth-printer
//!
//! ESC/POS thermal printing: HOW to print, not WHAT.
//!
//! - ticket building with width-aware columns
//! - GBK / Windows-1252 code pages
//! - raw TCP printing on port 9100
//!
//! Kitchen tickets and cash receipts are laid out by `hearth-client`.
//!
//! ## Example
//!
//! ```ignore
//! use hearth_printer::{CodePage, NetworkPrinter, Printer, TicketBuilder};
//!
//! let mut ticket = TicketBuilder::new(48, CodePage::Windows1252);
//! ticket.double_size().title("KITCHEN").normal_size();
//! ticket.line_lr("Table", "T4");
//! ticket.cut(3);
//!
//! let printer = NetworkPrinter::from_addr("192.168.1.100")?;
//! printer.print(&ticket.build()).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;

pub use encoding::CodePage;
pub use error::{PrintError, PrintResult};
pub use escpos::{Columns, TicketBuilder, WIDTH_58MM, WIDTH_80MM};
pub use printer::{DEFAULT_PORT, NetworkPrinter, Printer};
