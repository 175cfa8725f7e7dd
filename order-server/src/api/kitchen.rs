//! Kitchen API
//!
//! Kitchen screens see the active queue and move orders along
//! PENDING → PREPARING → READY → COMPLETED.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use serde::Deserialize;
use shared::models::Order;
use shared::order::OrderStatus;

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/kitchen", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(queue))
        .route("/orders/{id}/advance", post(advance))
        .route("/orders/{id}/status", put(update_status))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// GET /api/kitchen/orders - 厨房队列 (最早的在前)
async fn queue(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    Ok(ok(state.orders.kitchen_queue(&staff).await?))
}

/// POST /api/kitchen/orders/{id}/advance - 推进到下一状态
async fn advance(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(ok(state.orders.advance_status(&staff, &id).await?))
}

/// PUT /api/kitchen/orders/{id}/status - 设置指定状态
async fn update_status(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(ok(state
        .orders
        .update_status(&staff, &id, payload.status)
        .await?))
}
