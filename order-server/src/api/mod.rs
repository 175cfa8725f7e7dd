//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`menu`] - 菜单、菜品与分类
//! - [`tables`] - 桌台管理
//! - [`orders`] - 顾客下单与取消
//! - [`kitchen`] - 厨房队列与状态推进
//! - [`admin`] - 订单管理、拒单、对账、批量收款
//! - [`bills`] - 结账单
//! - [`service_requests`] - 呼叫服务
//! - [`changes`] - 变更通知 (SSE)
//!
//! Every handler receives its session through an extractor from
//! [`crate::auth`] and answers with the [`ApiResponse`](crate::utils::ApiResponse) envelope.

pub mod admin;
pub mod bills;
pub mod changes;
pub mod health;
pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod service_requests;
pub mod tables;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Customer + staff APIs
        .merge(menu::router())
        .merge(orders::router())
        .merge(service_requests::router())
        // Staff APIs
        .merge(kitchen::router())
        .merge(admin::router())
        .merge(tables::router())
        .merge(bills::router())
        // Change notifications
        .merge(changes::router())
}

/// Build a fully configured application with all middleware and state
///
/// Used by the HTTP server and by router tests (`oneshot`).
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .with_state(state)
        // CORS - table devices load the menu from another origin
        .layer(CorsLayer::permissive())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
}
