//! Customer Order API
//!
//! Orders are placed and cancelled from a table session. Prices always come
//! from the menu; the request only names items and quantities.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use shared::models::Order;

use crate::auth::CurrentCustomer;
use crate::core::ServerState;
use crate::orders::PlaceOrderRequest;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list).post(place))
        .route("/{id}/cancel", post(cancel))
}

/// POST /api/orders - 下单
async fn place(
    State(state): State<ServerState>,
    CurrentCustomer(session): CurrentCustomer,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.place_order(&session, payload).await?;
    Ok(ok_with_message(order, "Order placed"))
}

/// GET /api/orders - 本桌本手机号的订单
async fn list(
    State(state): State<ServerState>,
    CurrentCustomer(session): CurrentCustomer,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    Ok(ok(state.orders.list_for_customer(&session).await?))
}

/// POST /api/orders/{id}/cancel - 顾客取消 (仅 PENDING)
async fn cancel(
    State(state): State<ServerState>,
    CurrentCustomer(session): CurrentCustomer,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(ok(state.orders.cancel_order(&session, &id).await?))
}
