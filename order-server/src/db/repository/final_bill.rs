//! Final Bill Repository

use serde_json::{Value, json};
use shared::message::Resource;
use shared::models::FinalBill;
use shared::order::PaymentMethod;

use super::{BaseRepository, RepoResult, to_patch};
use crate::db::{DbService, RowQuery, SortOrder};

#[derive(Debug, Clone)]
pub struct FinalBillRepository {
    base: BaseRepository,
}

impl FinalBillRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db, Resource::FinalBill),
        }
    }

    pub async fn find_by_id(&self, workspace_id: &str, id: &str) -> RepoResult<Option<FinalBill>> {
        self.base.find_one(&RowQuery::by_id(workspace_id, id)).await
    }

    /// The open (unpaid) bill of a table+phone pair, if one was generated
    pub async fn find_unpaid_for(
        &self,
        workspace_id: &str,
        table_number: i32,
        phone: &str,
    ) -> RepoResult<Option<FinalBill>> {
        let query = RowQuery::workspace(workspace_id)
            .eq("table_number", table_number)
            .eq("customer_phone", phone)
            .eq("is_paid", false)
            .order_by("created_at", SortOrder::Desc);
        self.base.find_one(&query).await
    }

    /// Bills of a workspace, newest first
    pub async fn list(&self, workspace_id: &str, is_paid: Option<bool>) -> RepoResult<Vec<FinalBill>> {
        let mut query = RowQuery::workspace(workspace_id);
        if let Some(paid) = is_paid {
            query = query.eq("is_paid", paid);
        }
        self.base
            .find(&query.order_by("created_at", SortOrder::Desc))
            .await
    }

    pub async fn create(&self, bill: &FinalBill) -> RepoResult<FinalBill> {
        self.base.insert(bill).await
    }

    /// Overwrite an unpaid bill with a fresh snapshot (same id)
    pub async fn replace(&self, bill: &FinalBill) -> RepoResult<FinalBill> {
        let patch = to_patch(bill)?;
        self.base
            .update_by_id(&bill.workspace_id, &bill.id, patch)
            .await
    }

    pub async fn mark_paid(
        &self,
        workspace_id: &str,
        id: &str,
        method: Option<PaymentMethod>,
        paid_at: i64,
    ) -> RepoResult<FinalBill> {
        let mut patch = json!({ "is_paid": true, "paid_at": paid_at });
        if let (Some(method), Some(obj)) = (method, patch.as_object_mut()) {
            obj.insert("payment_method".into(), Value::from(method.as_str()));
        }
        self.base.update_by_id(workspace_id, id, patch).await
    }
}
