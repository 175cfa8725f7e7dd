//! Menu Item Repository

use serde_json::{Value, json};
use shared::message::Resource;
use shared::models::MenuItem;

use super::{BaseRepository, RepoResult};
use crate::db::{DbService, RowQuery, SortOrder};

#[derive(Debug, Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db, Resource::MenuItem),
        }
    }

    /// All items of a workspace (available or not), by sort order
    pub async fn find_all(&self, workspace_id: &str) -> RepoResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self
            .base
            .find(&RowQuery::workspace(workspace_id))
            .await?;
        items.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    pub async fn find_by_id(&self, workspace_id: &str, id: &str) -> RepoResult<Option<MenuItem>> {
        self.base.find_one(&RowQuery::by_id(workspace_id, id)).await
    }

    pub async fn find_many(&self, workspace_id: &str, ids: &[String]) -> RepoResult<Vec<MenuItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = RowQuery::workspace(workspace_id)
            .in_list("id", ids.iter().cloned())
            .order_by("name", SortOrder::Asc);
        self.base.find(&query).await
    }

    pub async fn create(&self, item: &MenuItem) -> RepoResult<MenuItem> {
        self.base.insert(item).await
    }

    pub async fn update(&self, workspace_id: &str, id: &str, patch: Value) -> RepoResult<MenuItem> {
        self.base.update_by_id(workspace_id, id, patch).await
    }

    pub async fn set_availability(
        &self,
        workspace_id: &str,
        id: &str,
        is_available: bool,
    ) -> RepoResult<MenuItem> {
        self.update(workspace_id, id, json!({ "is_available": is_available }))
            .await
    }
}
