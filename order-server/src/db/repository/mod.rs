//! Repository Module
//!
//! Typed, tenant-scoped access to backend tables. Every method takes the
//! workspace id explicitly; outgoing rows pass through
//! [`SchemaCapabilities::strip_unsupported`](crate::db::SchemaCapabilities::strip_unsupported).

// Orders & billing
pub mod final_bill;
pub mod order;

// Menu
pub mod category;
pub mod menu_item;

// Location
pub mod dining_table;

// Service
pub mod service_request;

// Re-exports
pub use category::CategoryRepository;
pub use dining_table::DiningTableRepository;
pub use final_bill::FinalBillRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use service_request::ServiceRequestRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::message::Resource;

use super::{DbService, RepoError, RepoResult, RowQuery};

/// Shared plumbing for the typed repositories
#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: DbService,
    resource: Resource,
}

impl BaseRepository {
    pub fn new(db: DbService, resource: Resource) -> Self {
        Self { db, resource }
    }

    pub fn db(&self) -> &DbService {
        &self.db
    }

    pub async fn find<T: DeserializeOwned>(&self, query: &RowQuery) -> RepoResult<Vec<T>> {
        let rows = self.db.store().select(self.resource, query).await?;
        rows.into_iter().map(decode).collect()
    }

    pub async fn find_one<T: DeserializeOwned>(&self, query: &RowQuery) -> RepoResult<Option<T>> {
        let query = query.clone().limit(1);
        Ok(self.find(&query).await?.into_iter().next())
    }

    pub async fn insert<T: Serialize + DeserializeOwned>(&self, value: &T) -> RepoResult<T> {
        let row = self.encode(value)?;
        let stored = self.db.store().insert(self.resource, row).await?;
        decode(stored)
    }

    /// Patch rows; `patch` is stripped of unsupported columns first
    pub async fn update<T: DeserializeOwned>(
        &self,
        query: &RowQuery,
        mut patch: Value,
    ) -> RepoResult<Vec<T>> {
        self.db.caps().strip_unsupported(self.resource, &mut patch);
        if patch.as_object().is_some_and(|o| o.is_empty()) {
            return self.find(query).await;
        }
        let rows = self.db.store().update(self.resource, query, patch).await?;
        rows.into_iter().map(decode).collect()
    }

    /// Patch exactly one row by id
    pub async fn update_by_id<T: DeserializeOwned>(
        &self,
        workspace_id: &str,
        id: &str,
        patch: Value,
    ) -> RepoResult<T> {
        self.update(&RowQuery::by_id(workspace_id, id), patch)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("{}:{}", self.resource, id)))
    }

    fn encode<T: Serialize>(&self, value: &T) -> RepoResult<Value> {
        let mut row = serde_json::to_value(value)?;
        self.db.caps().strip_unsupported(self.resource, &mut row);
        Ok(row)
    }
}

fn decode<T: DeserializeOwned>(row: Value) -> RepoResult<T> {
    serde_json::from_value(row).map_err(RepoError::from)
}

/// Serialize a value into a JSON patch object, dropping `id` and `workspace_id`
pub(crate) fn to_patch<T: Serialize>(value: &T) -> RepoResult<Value> {
    let mut patch = serde_json::to_value(value)?;
    if let Some(obj) = patch.as_object_mut() {
        obj.remove("id");
        obj.remove("workspace_id");
    }
    Ok(patch)
}
