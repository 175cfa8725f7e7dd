//! Admin Order API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/admin/orders | GET | 订单列表 (筛选) |
//! | /api/admin/orders/{id} | GET | 订单详情 |
//! | /api/admin/orders/{id}/reject | POST | 拒单 (缺货) |
//! | /api/admin/orders/{id}/reconcile | POST | 按当前菜单对账 |
//! | /api/admin/orders/payments | POST | 批量收款 |

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use shared::models::{Order, OrderFilter};

use crate::auth::CurrentStaff;
use crate::billing::PaymentOutcome;
use crate::core::ServerState;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list))
        .route("/payments", post(mark_paid))
        .route("/{id}", get(get_by_id))
        .route("/{id}/reject", post(reject))
        .route("/{id}/reconcile", post(reconcile))
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub order_ids: Vec<String>,
    pub payment_method: String,
}

/// GET /api/admin/orders - 订单列表 (最新的在前)
async fn list(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    Ok(ok(state.orders.list(&staff, &filter).await?))
}

/// GET /api/admin/orders/{id}
async fn get_by_id(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(ok(state.orders.get(&staff, &id).await?))
}

/// POST /api/admin/orders/{id}/reject - 拒单
async fn reject(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<RejectRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    let note = payload
        .note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    Ok(ok(state.orders.reject_order(&staff, &id, note).await?))
}

/// POST /api/admin/orders/{id}/reconcile - 按当前菜单移除不可售菜品
async fn reconcile(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(ok(state.orders.reconcile_order(&staff, &id).await?))
}

/// POST /api/admin/orders/payments - 批量收款
async fn mark_paid(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Json(payload): Json<PaymentRequest>,
) -> AppResult<Json<ApiResponse<PaymentOutcome>>> {
    let outcome = state
        .billing
        .mark_orders_paid(&staff, &payload.order_ids, &payload.payment_method)
        .await?;
    let message = match outcome.downgraded_from {
        Some(requested) => format!(
            "Payment recorded as {} ({} not supported)",
            outcome.method, requested
        ),
        None => "Payment recorded".to_string(),
    };
    Ok(ok_with_message(outcome, message))
}
