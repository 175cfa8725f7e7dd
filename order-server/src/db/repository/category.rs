//! Category Repository

use serde_json::Value;
use shared::message::Resource;
use shared::models::Category;

use super::{BaseRepository, RepoResult};
use crate::db::{DbService, RowQuery, SortOrder};

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db, Resource::Category),
        }
    }

    pub async fn find_all(&self, workspace_id: &str) -> RepoResult<Vec<Category>> {
        let query = RowQuery::workspace(workspace_id).order_by("sort_order", SortOrder::Asc);
        self.base.find(&query).await
    }

    pub async fn find_by_id(&self, workspace_id: &str, id: &str) -> RepoResult<Option<Category>> {
        self.base.find_one(&RowQuery::by_id(workspace_id, id)).await
    }

    pub async fn create(&self, category: &Category) -> RepoResult<Category> {
        self.base.insert(category).await
    }

    pub async fn update(&self, workspace_id: &str, id: &str, patch: Value) -> RepoResult<Category> {
        self.base.update_by_id(workspace_id, id, patch).await
    }
}
