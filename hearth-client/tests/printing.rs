mod common;

use common::{captain_order, logged_in, ok};
use hearth_client::{ClientError, ErrorKind, PrintService, PrinterConfig, TicketContext};
use hearth_printer::CodePage;
use shared::document::{CaptainOrderParties, CaptainOrderStatus};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

/// Fake 9100 printer that hands back whatever it received
async fn fake_printer() -> (String, tokio::task::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        socket.read_to_end(&mut received).await.unwrap();
        received
    });
    (addr, handle)
}

fn service(addr: Option<String>) -> PrintService {
    let config = PrinterConfig {
        addr,
        paper_width: 48,
        code_page: CodePage::Windows1252,
    };
    PrintService::from_config(&config, Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn printed_ticket_then_marked_printed() {
    let server = MockServer::start().await;
    let client = logged_in(&server, &["captain_order:*"]).await;
    let (addr, printer) = fake_printer().await;

    Mock::given(method("GET"))
        .and(path("/api/captain-orders/3"))
        .respond_with(ok(captain_order(3, "CREATED", &[(500, 2)])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/captain-orders/3/print"))
        .respond_with(ok(captain_order(3, "PRINTED", &[(500, 2)])))
        .expect(1)
        .mount(&server)
        .await;

    let mut order = client
        .open::<CaptainOrderStatus, CaptainOrderParties>(3)
        .await
        .unwrap();
    service(Some(addr))
        .print_captain_order(&mut order, &TicketContext::new("Hearth Hotel"))
        .await
        .unwrap();
    assert_eq!(order.document().status, CaptainOrderStatus::Printed);

    let bytes = printer.await.unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("T4"));
    assert!(text.contains("  2 x Menu 500"));
}

#[tokio::test]
async fn offline_printer_leaves_status_alone() {
    let server = MockServer::start().await;
    let client = logged_in(&server, &["captain_order:*"]).await;

    // bind then drop so the port refuses connections
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().to_string()
    };

    Mock::given(method("GET"))
        .and(path("/api/captain-orders/3"))
        .respond_with(ok(captain_order(3, "CREATED", &[(500, 2)])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/captain-orders/3/print"))
        .respond_with(ok(captain_order(3, "PRINTED", &[(500, 2)])))
        .expect(0)
        .mount(&server)
        .await;

    let mut order = client
        .open::<CaptainOrderStatus, CaptainOrderParties>(3)
        .await
        .unwrap();
    let err = service(Some(addr))
        .print_captain_order(&mut order, &TicketContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Print(_)));
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(order.document().status, CaptainOrderStatus::Pending);
}

#[tokio::test]
async fn print_without_permission_sends_nothing() {
    let server = MockServer::start().await;
    let client = logged_in(&server, &["cash_receipt:*"]).await;

    Mock::given(method("GET"))
        .and(path("/api/captain-orders/3"))
        .respond_with(ok(captain_order(3, "CREATED", &[(500, 2)])))
        .mount(&server)
        .await;

    let mut order = client
        .open::<CaptainOrderStatus, CaptainOrderParties>(3)
        .await
        .unwrap();
    // port 9 is never contacted: the gate refuses first
    let err = service(Some("127.0.0.1:9".into()))
        .print_captain_order(&mut order, &TicketContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Workflow(_)));
}
