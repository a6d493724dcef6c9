//! Push notifications
//!
//! The server pushes "new notification" events over a framed TCP stream
//! (see [`shared::message`]). Delivery is best effort: no reconnect, no
//! replay. Use `GET /notifications` to catch up after a drop.

mod listener;
mod transport;

pub use listener::NotificationListener;
pub use transport::{TcpTransport, Transport};
