use std::time::Duration;

use crate::billing::BillingService;
use crate::core::{Config, ServerError};
use crate::db::DbService;
use crate::orders::OrdersManager;
use crate::services::{MenuService, ServiceRequestService, TableService};

/// 服务器状态 - 持有所有服务的单例引用
///
/// 所有服务内部只持有 [`DbService`] 的 Arc 克隆，浅拷贝成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | 后端数据服务 + 已校验的 schema 能力 |
/// | orders | OrdersManager | 订单生命周期 |
/// | billing | BillingService | 结账单与支付 |
/// | menu | MenuService | 菜品与分类 |
/// | tables | TableService | 桌台 |
/// | service_requests | ServiceRequestService | 呼叫服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 后端数据服务
    pub db: DbService,
    pub orders: OrdersManager,
    pub billing: BillingService,
    pub menu: MenuService,
    pub tables: TableService,
    pub service_requests: ServiceRequestService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 连接后端并校验 schema 契约 (不兼容时直接失败)
    /// 2. 校验降级支付方式可被后端存储
    /// 3. 各业务服务
    pub async fn initialize(config: &Config) -> Result<Self, ServerError> {
        let db = DbService::connect(config).await?;
        Self::with_db(config.clone(), db)
    }

    /// 使用已有的数据服务构造 (测试用内存后端)
    pub fn with_db(config: Config, db: DbService) -> Result<Self, ServerError> {
        db.caps()
            .check_default_payment_method(config.default_payment_method)?;

        let orders = OrdersManager::new(db.clone());
        Ok(Self {
            billing: BillingService::new(db.clone(), config.default_payment_method),
            menu: MenuService::new(db.clone(), orders.clone()),
            tables: TableService::new(db.clone()),
            service_requests: ServiceRequestService::new(db.clone()),
            orders,
            db,
            config,
        })
    }

    /// 启动后台任务 (REST 后端的订单变更轮询)
    pub fn start_background_tasks(&self) {
        let interval = Duration::from_millis(self.config.backend.poll_interval_ms.max(100));
        self.db.start_polling(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{BackendSchema, MemoryStore, SchemaContract};
    use shared::message::Resource;
    use shared::order::PaymentMethod;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_unsupported_default_payment_method_fails() {
        let schema = BackendSchema::from_contract(&SchemaContract::current()).with_enum(
            Resource::Order,
            "payment_method",
            &["card", "upi"],
        );
        let store = MemoryStore::with_schema(schema, 16);
        let db = DbService::new(Arc::new(store)).await.unwrap();

        let mut config = Config::with_overrides("/tmp/order-server-test", 0);
        config.default_payment_method = PaymentMethod::Cash;
        let err = ServerState::with_db(config.clone(), db.clone()).unwrap_err();
        assert!(matches!(err, ServerError::Schema(_)));

        config.default_payment_method = PaymentMethod::Card;
        assert!(ServerState::with_db(config, db).is_ok());
    }
}
