//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 简单健康检查 | 无 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "schema_version": 3,
//!   "payment_methods": ["cash", "card", "upi", "online"]
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use shared::order::PaymentMethod;

use crate::core::ServerState;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// 简单健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 状态 (ok | error)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 后端 schema 版本 (启动时校验)
    schema_version: u32,
    /// 后端可存储的支付方式
    payment_methods: Vec<PaymentMethod>,
    /// 当前变更订阅数
    subscribers: usize,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let caps = state.db.caps();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        schema_version: caps.version,
        payment_methods: caps.payment_methods().to_vec(),
        subscribers: state.db.feed().subscriber_count(),
    })
}
