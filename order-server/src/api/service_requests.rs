//! Service Request API (呼叫服务)

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use shared::models::{ServiceRequest, ServiceRequestCreate};

use crate::auth::{CurrentCustomer, CurrentStaff};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/service-requests", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list_open).post(raise))
        .route("/{id}/resolve", post(resolve))
}

/// POST /api/service-requests - 顾客呼叫
async fn raise(
    State(state): State<ServerState>,
    CurrentCustomer(session): CurrentCustomer,
    Json(payload): Json<ServiceRequestCreate>,
) -> AppResult<Json<ApiResponse<ServiceRequest>>> {
    Ok(ok(state.service_requests.raise(&session, payload).await?))
}

/// GET /api/service-requests - 未处理的呼叫
async fn list_open(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
) -> AppResult<Json<ApiResponse<Vec<ServiceRequest>>>> {
    Ok(ok(state.service_requests.list_open(&staff).await?))
}

/// POST /api/service-requests/{id}/resolve
async fn resolve(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ServiceRequest>>> {
    Ok(ok(state.service_requests.resolve(&staff, &id).await?))
}
