//! Dining Table API 模块

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", put(update))
}

/// GET /api/tables - 获取所有桌台
async fn list(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
) -> AppResult<Json<ApiResponse<Vec<DiningTable>>>> {
    Ok(ok(state.tables.list(&staff).await?))
}

/// POST /api/tables - 创建桌台
async fn create(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    Ok(ok(state.tables.create(&staff, payload).await?))
}

/// PUT /api/tables/{id} - 更新桌台
async fn update(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    Ok(ok(state.tables.update(&staff, &id, payload).await?))
}
