use thiserror::Error;

use crate::db::SchemaError;

/// 服务器启动/运行错误
///
/// Request-level failures use [`shared::error::AppError`]; this type covers
/// startup and the serve loop only.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("后端 schema 不兼容: {0}")]
    Schema(#[from] SchemaError),

    #[error("无法绑定端口 {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
