//! Menu API
//!
//! | 路径 | 方法 | 说明 | 会话 |
//! |------|------|------|------|
//! | /api/menu | GET | 菜单 (顾客只见可售菜品) | 顾客 / 员工 |
//! | /api/menu/items | POST | 新建菜品 | 管理员 |
//! | /api/menu/items/{id} | PUT | 更新菜品 | 管理员 |
//! | /api/menu/items/{id}/availability | PUT | 上下架 (下架触发订单对账) | 管理员 |
//! | /api/menu/categories | POST | 新建分类 | 管理员 |
//! | /api/menu/categories/{id} | PUT | 更新分类 | 管理员 |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use serde::Deserialize;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, MenuItem, MenuItemCreate, MenuItemUpdate,
};

use crate::auth::{CurrentStaff, CurrentWorkspace};
use crate::core::ServerState;
use crate::services::{AvailabilityChange, MenuView};
use crate::utils::{ApiResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(menu))
        .route("/items", post(create_item))
        .route("/items/{id}", put(update_item))
        .route("/items/{id}/availability", put(set_availability))
        .route("/categories", post(create_category))
        .route("/categories/{id}", put(update_category))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

/// GET /api/menu - 菜单
async fn menu(
    State(state): State<ServerState>,
    CurrentWorkspace(workspace_id): CurrentWorkspace,
    staff: Option<CurrentStaff>,
) -> AppResult<Json<ApiResponse<MenuView>>> {
    let view = state.menu.menu(&workspace_id, staff.is_some()).await?;
    Ok(ok(view))
}

/// POST /api/menu/items - 新建菜品
async fn create_item(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    Ok(ok(state.menu.create_item(&staff, payload).await?))
}

/// PUT /api/menu/items/{id} - 更新菜品
async fn update_item(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    Ok(ok(state.menu.update_item(&staff, &id, payload).await?))
}

/// PUT /api/menu/items/{id}/availability - 上下架
async fn set_availability(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<AvailabilityRequest>,
) -> AppResult<Json<ApiResponse<AvailabilityChange>>> {
    let change = state
        .menu
        .set_availability(&staff, &id, payload.is_available)
        .await?;
    Ok(ok(change))
}

/// POST /api/menu/categories - 新建分类
async fn create_category(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    Ok(ok(state.menu.create_category(&staff, payload).await?))
}

/// PUT /api/menu/categories/{id} - 更新分类
async fn update_category(
    State(state): State<ServerState>,
    CurrentStaff(staff): CurrentStaff,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    Ok(ok(state.menu.update_category(&staff, &id, payload).await?))
}
