#![allow(dead_code)]

use hearth_client::{ClientConfig, HearthClient};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 0, "message": "OK", "data": data}))
}

pub fn rejected(status: u16, code: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({"code": code, "message": message}))
}

pub fn user(permissions: &[&str]) -> Value {
    json!({
        "id": 2,
        "username": "maria",
        "full_name": "Maria Kovac",
        "role": "manager",
        "permissions": permissions,
    })
}

pub fn client_for(server: &MockServer) -> HearthClient {
    let config = ClientConfig::new(format!("{}/api", server.uri())).with_timeout(5);
    HearthClient::new(config).unwrap()
}

/// Mount the login endpoint and log in
pub async fn logged_in(server: &MockServer, permissions: &[&str]) -> HearthClient {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ok(json!({"user": user(permissions)}))
                .insert_header("set-cookie", "sid=abc123; Path=/; HttpOnly"),
        )
        .mount(server)
        .await;
    let client = client_for(server);
    client.login("maria", "secret").await.unwrap();
    client
}

pub fn purchase_order(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "number": format!("PO-{:04}", id),
        "date": "2026-05-04",
        "status": status,
        "created_by": 9,
        "supplier_id": 3,
        "items": [
            {"id": 11, "ref_id": 100, "name": "Rice 25kg", "quantity": 4, "unit_price": 31.5},
            {"id": 12, "ref_id": 101, "name": "Olive oil", "quantity": 2, "unit_price": 12}
        ]
    })
}

pub fn captain_order(id: i64, status: &str, rows: &[(i64, u32)]) -> Value {
    let items: Vec<Value> = rows
        .iter()
        .enumerate()
        .map(|(i, (menu, qty))| {
            json!({"id": id * 100 + i as i64, "menu_id": menu, "name": format!("Menu {}", menu),
                   "quantity": qty, "unit_price": 6.5})
        })
        .collect();
    json!({
        "id": id,
        "number": format!("CO-{}", id),
        "date": "2026-05-04",
        "status": status,
        "created_by": 9,
        "waiter_id": 4,
        "table_number": "T4",
        "items": items
    })
}
