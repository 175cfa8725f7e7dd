use shared::order::PaymentMethod;

/// Backend data service kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// 内存存储 (开发/测试)
    #[default]
    Memory,
    /// PostgREST 风格的 REST 后端
    Rest,
}

impl BackendKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Some(BackendKind::Memory),
            "rest" | "postgrest" => Some(BackendKind::Rest),
            _ => None,
        }
    }
}

/// 后端数据服务配置
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Base URL, e.g. https://project.example.co
    pub url: String,
    /// Service key sent as `apikey` and bearer token
    pub api_key: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 订单轮询间隔 (毫秒)
    pub poll_interval_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Memory,
            url: String::new(),
            api_key: String::new(),
            request_timeout_ms: 30000,
            poll_interval_ms: 5000,
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/order-server | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | BACKEND_KIND | memory | memory \| rest |
/// | BACKEND_URL | (空) | 后端地址 |
/// | BACKEND_API_KEY | (空) | 后端密钥 |
/// | REQUEST_TIMEOUT_MS | 30000 | 后端请求超时(毫秒) |
/// | POLL_INTERVAL_MS | 5000 | 订单变更轮询间隔(毫秒) |
/// | DEFAULT_PAYMENT_METHOD | cash | 支付方式降级目标 |
/// | FEED_CAPACITY | 1024 | 变更通知缓冲区大小 |
///
/// Logging is configured separately by `LOG_LEVEL`, `LOG_JSON` and `LOG_DIR`
/// (see [`crate::setup_environment`]).
///
/// # 示例
///
/// ```ignore
/// BACKEND_KIND=rest BACKEND_URL=https://db.example HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 后端数据服务
    pub backend: BackendConfig,
    /// Fallback when the backend cannot store the requested payment method
    pub default_payment_method: PaymentMethod,
    /// 变更通知 broadcast 容量
    pub feed_capacity: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let kind = std::env::var("BACKEND_KIND")
            .ok()
            .and_then(|v| BackendKind::parse(&v))
            .unwrap_or_default();

        let default_payment_method = match std::env::var("DEFAULT_PAYMENT_METHOD") {
            Ok(raw) => PaymentMethod::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Unknown DEFAULT_PAYMENT_METHOD, using cash");
                PaymentMethod::Cash
            }),
            Err(_) => PaymentMethod::Cash,
        };

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/order-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            backend: BackendConfig {
                kind,
                url: std::env::var("BACKEND_URL").unwrap_or_default(),
                api_key: std::env::var("BACKEND_API_KEY").unwrap_or_default(),
                request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(30000),
                poll_interval_ms: std::env::var("POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(5000),
            },
            default_payment_method,
            feed_capacity: std::env::var("FEED_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1024),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景 (内存后端)
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.backend.kind = BackendKind::Memory;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(BackendKind::parse("REST"), Some(BackendKind::Rest));
        assert_eq!(BackendKind::parse(" memory "), Some(BackendKind::Memory));
        assert_eq!(BackendKind::parse("sqlite"), None);
    }

    #[test]
    fn test_with_overrides_forces_memory_backend() {
        let config = Config::with_overrides("/tmp/order-server-test", 0);
        assert_eq!(config.work_dir, "/tmp/order-server-test");
        assert_eq!(config.http_port, 0);
        assert_eq!(config.backend.kind, BackendKind::Memory);
    }
}
