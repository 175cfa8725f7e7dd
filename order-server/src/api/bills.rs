//! Final Bill API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/bills/preview?table_number=&phone= | GET | 预览 (不保存) |
//! | /api/bills | POST | 生成结账单 (覆盖同桌同手机号的未付账单) |
//! | /api/bills?is_paid= | GET | 账单列表 |
//! | /api/bills/{id} | GET | 账单详情 |
//! | /api/bills/{id}/pay | POST | 收款 (账单及全部订单) |

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use shared::models::FinalBill;

use crate::auth::CurrentStaff;
use crate::billing::{BillDraft, PaidBill};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bills", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list).post(generate))
        .route("/preview", get(preview))
        .route("/{id}", get(get_by_id))
        .route("/{id}/pay", post(pay))
}

/// Table + phone pair identifying a billing session
#[derive(Debug, Deserialize)]
pub struct BillTarget {
    pub table_number: i32,
    pub phone: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub is_paid: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PayRequest {
    pub payment_method: String,
}

/// GET /api/bills/preview
async fn preview(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Query(target): Query<BillTarget>,
) -> AppResult<Json<ApiResponse<BillDraft>>> {
    let draft = state
        .billing
        .preview(&staff, target.table_number, &target.phone)
        .await?;
    Ok(ok(draft))
}

/// POST /api/bills
async fn generate(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Json(target): Json<BillTarget>,
) -> AppResult<Json<ApiResponse<FinalBill>>> {
    let bill = state
        .billing
        .generate_final_bill(&staff, target.table_number, &target.phone)
        .await?;
    Ok(ok_with_message(bill, "Final bill generated"))
}

/// GET /api/bills
async fn list(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<FinalBill>>>> {
    Ok(ok(state.billing.list(&staff, query.is_paid).await?))
}

/// GET /api/bills/{id}
async fn get_by_id(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<FinalBill>>> {
    Ok(ok(state.billing.get(&staff, &id).await?))
}

/// POST /api/bills/{id}/pay
async fn pay(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<PayRequest>,
) -> AppResult<Json<ApiResponse<PaidBill>>> {
    let paid = state
        .billing
        .pay_final_bill(&staff, &id, &payload.payment_method)
        .await?;
    Ok(ok(paid))
}
