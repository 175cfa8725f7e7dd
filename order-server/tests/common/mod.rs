//! Shared fixtures for integration tests (in-memory backend)

#![allow(dead_code)]

use std::sync::Arc;

use order_server::core::Config;
use order_server::db::{BackendSchema, DbService, MemoryStore};
use order_server::orders::PlaceOrderRequest;
use order_server::ServerState;
use serde_json::json;
use shared::message::Resource;
use shared::models::Order;
use shared::order::OrderItemInput;
use shared::session::{CustomerSession, StaffRole, StaffSession};

pub const WS: &str = "ws-spice-route";
pub const OTHER_WS: &str = "ws-other";
pub const PHONE: &str = "9876543210";

pub struct TestEnv {
    pub state: ServerState,
    pub store: Arc<MemoryStore>,
}

pub async fn setup() -> TestEnv {
    setup_with(MemoryStore::default(), Config::with_overrides("/tmp/order-server-test", 0)).await
}

pub async fn setup_with_schema(schema: BackendSchema, config: Config) -> TestEnv {
    setup_with(MemoryStore::with_schema(schema, 256), config).await
}

async fn setup_with(store: MemoryStore, config: Config) -> TestEnv {
    let store = Arc::new(store);
    seed_fixtures(&store);
    let db = DbService::new(store.clone()).await.unwrap();
    let state = ServerState::with_db(config, db).unwrap();
    TestEnv { state, store }
}

/// Tables 1-3 (3 inactive) and a small menu in [`WS`]; one table in [`OTHER_WS`]
fn seed_fixtures(store: &MemoryStore) {
    for (number, active) in [(1, true), (2, true), (3, false)] {
        store.seed(
            Resource::DiningTable,
            json!({
                "id": format!("t-{}", number),
                "workspace_id": WS,
                "table_number": number,
                "is_active": active,
            }),
        );
    }
    store.seed(
        Resource::DiningTable,
        json!({ "id": "t-other", "workspace_id": OTHER_WS, "table_number": 1, "is_active": true }),
    );

    for (id, name, price, available) in [
        ("m-dosa", "Masala Dosa", 120.0, true),
        ("m-chai", "Masala Chai", 30.0, true),
        ("m-lassi", "Mango Lassi", 80.0, true),
        ("m-paneer", "Paneer Tikka", 250.5, true),
        ("m-off", "Seasonal Thali", 300.0, false),
    ] {
        store.seed(
            Resource::MenuItem,
            json!({
                "id": id,
                "workspace_id": WS,
                "name": name,
                "price": price,
                "is_available": available,
                "sort_order": 0,
            }),
        );
    }
}

pub fn customer(table_number: i32, phone: &str) -> CustomerSession {
    CustomerSession::new(WS, table_number, "Kavya", phone)
}

pub fn admin() -> StaffSession {
    StaffSession::new(WS, StaffRole::Admin)
}

pub fn kitchen() -> StaffSession {
    StaffSession::new(WS, StaffRole::Kitchen)
}

pub fn request(items: &[(&str, i32)]) -> PlaceOrderRequest {
    PlaceOrderRequest {
        items: items
            .iter()
            .map(|(id, quantity)| OrderItemInput {
                menu_item_id: id.to_string(),
                quantity: *quantity,
            })
            .collect(),
    }
}

pub async fn place(env: &TestEnv, session: &CustomerSession, items: &[(&str, i32)]) -> Order {
    let order = env
        .state
        .orders
        .place_order(session, request(items))
        .await
        .unwrap();
    // created_at has millisecond resolution; keep orders strictly ordered
    tokio::time::sleep(std::time::Duration::from_millis(3)).await;
    order
}
