//! Order Server - 扫码点餐订单与结账服务
//!
//! # 架构概述
//!
//! Customers scan a table QR code, browse the menu and place orders; the
//! kitchen moves orders through their lifecycle; admins reconcile orders with
//! menu availability, generate final bills and record payments.
//!
//! - **订单** (`orders`): 状态机、下单、取消、拒单、可售对账
//! - **结账** (`billing`): 账单聚合 (会话边界)、批量收款与支付方式降级
//! - **数据** (`db`): 后端数据服务抽象 (内存 / PostgREST)，启动时校验 schema 契约
//! - **会话** (`auth`): 每个请求显式构造的顾客 / 员工会话
//! - **HTTP API** (`api`): RESTful API + SSE 变更通知
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务器
//! ├── auth/          # 会话提取
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单生命周期
//! ├── billing/       # 账单与支付
//! ├── services/      # 菜单、桌台、呼叫服务
//! ├── db/            # 数据服务、schema 契约、变更通知
//! └── utils/         # 日志、校验、响应
//! ```

pub mod api;
pub mod auth;
pub mod billing;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentCustomer, CurrentStaff, CurrentWorkspace};
pub use billing::BillingService;
pub use core::{Config, Server, ServerError, ServerState};
pub use orders::OrdersManager;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境
///
/// 1. 加载 `.env` (不存在时忽略)
/// 2. 初始化日志: `LOG_LEVEL` (info), `LOG_JSON` (false), `LOG_DIR` (可选)
pub fn setup_environment() -> Result<(), ServerError> {
    let env_file = dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").ok();
    let json = std::env::var("LOG_JSON")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok();

    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir).map_err(|e| {
            ServerError::Internal(anyhow::anyhow!("failed to create log dir {}: {}", dir, e))
        })?;
    }

    init_logger_with_file(level.as_deref(), json, log_dir.as_deref());
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ____          _              ____
 / __ \________/ /__  _____   / __/__  ______  _____  _____
/ / / / ___/ __  / _ \/ ___/  \ \/ _ \/ ___/ | / / _ \/ ___/
/ /_/ / /  / /_/ /  __/ /    ___/ /  __/ /   | |/ /  __/ /
\____/_/   \__,_/\___/_/    /____/\___/_/    |___/\___/_/
    "#
    );
}
