//! Order Repository

use serde_json::{Value, json};
use shared::message::Resource;
use shared::models::{Order, OrderFilter};
use shared::order::{OrderStatus, PaymentMethod, PaymentStatus};

use super::{BaseRepository, RepoResult, to_patch};
use crate::db::{DbService, RowQuery, SortOrder};

/// Default page size for admin listings
const DEFAULT_LIST_LIMIT: usize = 200;

#[derive(Debug, Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db, Resource::Order),
        }
    }

    pub async fn find_by_id(&self, workspace_id: &str, id: &str) -> RepoResult<Option<Order>> {
        self.base.find_one(&RowQuery::by_id(workspace_id, id)).await
    }

    /// Orders with the given ids (missing ids are simply absent)
    pub async fn find_many(&self, workspace_id: &str, ids: &[String]) -> RepoResult<Vec<Order>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = RowQuery::workspace(workspace_id)
            .in_list("id", ids.iter().cloned())
            .order_by("created_at", SortOrder::Asc);
        self.base.find(&query).await
    }

    /// Every order of a table, oldest first
    pub async fn find_by_table(&self, workspace_id: &str, table_number: i32) -> RepoResult<Vec<Order>> {
        let query = RowQuery::workspace(workspace_id)
            .eq("table_number", table_number)
            .order_by("created_at", SortOrder::Asc);
        self.base.find(&query).await
    }

    /// Orders placed from a table by one phone number, oldest first
    pub async fn find_for_customer(
        &self,
        workspace_id: &str,
        table_number: i32,
        phone: &str,
    ) -> RepoResult<Vec<Order>> {
        let orders = self.find_by_table(workspace_id, table_number).await?;
        Ok(orders
            .into_iter()
            .filter(|o| o.belongs_to(table_number, phone))
            .collect())
    }

    /// Kitchen queue: PENDING / PREPARING / READY, oldest first
    pub async fn find_active(&self, workspace_id: &str) -> RepoResult<Vec<Order>> {
        let query = RowQuery::workspace(workspace_id)
            .in_list("status", active_statuses())
            .order_by("created_at", SortOrder::Asc);
        self.base.find(&query).await
    }

    /// Orders still subject to availability reconciliation
    pub async fn find_reconcilable(&self, workspace_id: &str) -> RepoResult<Vec<Order>> {
        let query = RowQuery::workspace(workspace_id)
            .in_list("status", active_statuses())
            .eq("payment_status", PaymentStatus::Unpaid.as_str())
            .order_by("created_at", SortOrder::Asc);
        self.base.find(&query).await
    }

    /// Admin listing, newest first
    pub async fn list(&self, workspace_id: &str, filter: &OrderFilter) -> RepoResult<Vec<Order>> {
        let mut query = RowQuery::workspace(workspace_id);
        if let Some(table) = filter.table_number {
            query = query.eq("table_number", table);
        }
        if let Some(status) = filter.status {
            query = query.eq("status", status.as_str());
        }
        if let Some(payment) = filter.payment_status {
            query = query.eq("payment_status", payment.as_str());
        }
        if let Some(since) = filter.since {
            query = query.gt("created_at", since);
        }
        let query = query
            .order_by("created_at", SortOrder::Desc)
            .limit(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT));
        self.base.find(&query).await
    }

    pub async fn create(&self, order: &Order) -> RepoResult<Order> {
        self.base.insert(order).await
    }

    /// Persist the mutable fields of an order
    pub async fn save(&self, order: &Order) -> RepoResult<Order> {
        let patch = to_patch(order)?;
        self.base
            .update_by_id(&order.workspace_id, &order.id, patch)
            .await
    }

    /// Bulk payment update: one backend call for all ids
    pub async fn mark_paid(
        &self,
        workspace_id: &str,
        ids: &[String],
        method: Option<PaymentMethod>,
        now: i64,
    ) -> RepoResult<Vec<Order>> {
        let mut patch = json!({
            "payment_status": PaymentStatus::Paid.as_str(),
            "updated_at": now,
        });
        if let (Some(method), Some(obj)) = (method, patch.as_object_mut()) {
            obj.insert("payment_method".into(), Value::from(method.as_str()));
        }
        let query = RowQuery::workspace(workspace_id).in_list("id", ids.iter().cloned());
        self.base.update(&query, patch).await
    }
}

fn active_statuses() -> Vec<&'static str> {
    OrderStatus::ALL
        .into_iter()
        .filter(|s| s.is_active())
        .map(OrderStatus::as_str)
        .collect()
}
