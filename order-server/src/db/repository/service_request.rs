//! Service Request Repository

use serde_json::json;
use shared::message::Resource;
use shared::models::{ServiceRequest, ServiceRequestKind, ServiceRequestStatus};

use super::{BaseRepository, RepoResult};
use crate::db::{DbService, RowQuery, SortOrder};

#[derive(Debug, Clone)]
pub struct ServiceRequestRepository {
    base: BaseRepository,
}

impl ServiceRequestRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db, Resource::ServiceRequest),
        }
    }

    pub async fn find_by_id(&self, workspace_id: &str, id: &str) -> RepoResult<Option<ServiceRequest>> {
        self.base.find_one(&RowQuery::by_id(workspace_id, id)).await
    }

    /// The open request of the same kind at the same table, if any
    pub async fn find_open(
        &self,
        workspace_id: &str,
        table_number: i32,
        kind: ServiceRequestKind,
    ) -> RepoResult<Option<ServiceRequest>> {
        let query = RowQuery::workspace(workspace_id)
            .eq("table_number", table_number)
            .eq("kind", serde_json::to_value(kind)?)
            .eq("status", serde_json::to_value(ServiceRequestStatus::Open)?);
        self.base.find_one(&query).await
    }

    /// Open requests of a workspace, oldest first
    pub async fn list_open(&self, workspace_id: &str) -> RepoResult<Vec<ServiceRequest>> {
        let query = RowQuery::workspace(workspace_id)
            .eq("status", serde_json::to_value(ServiceRequestStatus::Open)?)
            .order_by("created_at", SortOrder::Asc);
        self.base.find(&query).await
    }

    pub async fn create(&self, request: &ServiceRequest) -> RepoResult<ServiceRequest> {
        self.base.insert(request).await
    }

    pub async fn resolve(&self, workspace_id: &str, id: &str, now: i64) -> RepoResult<ServiceRequest> {
        let patch = json!({
            "status": ServiceRequestStatus::Resolved,
            "resolved_at": now,
        });
        self.base.update_by_id(workspace_id, id, patch).await
    }
}
