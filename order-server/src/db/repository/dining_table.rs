//! Dining Table Repository

use serde_json::Value;
use shared::message::Resource;
use shared::models::DiningTable;

use super::{BaseRepository, RepoResult};
use crate::db::{DbService, RowQuery, SortOrder};

#[derive(Debug, Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db, Resource::DiningTable),
        }
    }

    /// All tables of a workspace, by number
    pub async fn find_all(&self, workspace_id: &str) -> RepoResult<Vec<DiningTable>> {
        let query = RowQuery::workspace(workspace_id).order_by("table_number", SortOrder::Asc);
        self.base.find(&query).await
    }

    pub async fn find_by_id(&self, workspace_id: &str, id: &str) -> RepoResult<Option<DiningTable>> {
        self.base.find_one(&RowQuery::by_id(workspace_id, id)).await
    }

    /// Find table by the number printed on its QR code
    pub async fn find_by_number(
        &self,
        workspace_id: &str,
        table_number: i32,
    ) -> RepoResult<Option<DiningTable>> {
        let query = RowQuery::workspace(workspace_id).eq("table_number", table_number);
        self.base.find_one(&query).await
    }

    pub async fn create(&self, table: &DiningTable) -> RepoResult<DiningTable> {
        self.base.insert(table).await
    }

    pub async fn update(&self, workspace_id: &str, id: &str, patch: Value) -> RepoResult<DiningTable> {
        self.base.update_by_id(workspace_id, id, patch).await
    }
}
