mod common;

use common::{client_for, logged_in, ok, purchase_order, rejected, user};
use hearth_client::{AuthState, ClientError, ErrorKind};
use serde_json::json;
use shared::document::{OrderParties, PurchaseOrderStatus};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn login_sets_session_and_cookie_is_replayed() {
    let server = MockServer::start().await;
    let client = logged_in(&server, &["purchase_order:*"]).await;

    assert!(client.session().is_logged_in());
    assert_eq!(client.session().current_user().unwrap().username, "maria");

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("cookie", "sid=abc123"))
        .respond_with(ok(user(&["purchase_order:*", "cash_receipt:print"])))
        .expect(1)
        .mount(&server)
        .await;

    let me = client.auth().me().await.unwrap();
    assert_eq!(me.permissions.len(), 2);
}

#[tokio::test]
async fn bad_credentials_are_a_server_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(rejected(401, 1002, "Invalid username or password"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.login("maria", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid username or password");
    assert!(!client.session().is_logged_in());
}

#[tokio::test]
async fn expired_session_is_refreshed_once_and_request_replayed() {
    let server = MockServer::start().await;
    let client = logged_in(&server, &["purchase_order:*"]).await;

    Mock::given(method("GET"))
        .and(path("/api/purchase-orders/7"))
        .respond_with(rejected(401, 1001, "Not authenticated"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/purchase-orders/7"))
        .respond_with(ok(purchase_order(7, "REQUESTED")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let po = client.purchase_orders().get(7).await.unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Requested);
    assert!(client.session().is_logged_in());
}

#[tokio::test]
async fn failed_refresh_forces_logout() {
    let server = MockServer::start().await;
    let client = logged_in(&server, &["purchase_order:*"]).await;
    let mut auth = client.session().subscribe();

    Mock::given(method("GET"))
        .and(path("/api/purchase-orders/7"))
        .respond_with(rejected(401, 1001, "Not authenticated"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(rejected(401, 1005, "Session expired"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.documents::<PurchaseOrderStatus, OrderParties>().get(7).await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
    assert_eq!(err.kind(), ErrorKind::AuthExpired);

    auth.changed().await.unwrap();
    assert!(matches!(*auth.borrow(), AuthState::LoggedOut));
}

#[tokio::test]
async fn logout_clears_session_even_if_server_fails() {
    let server = MockServer::start().await;
    let client = logged_in(&server, &[]).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client.logout().await.is_err());
    assert!(!client.session().is_logged_in());
}
