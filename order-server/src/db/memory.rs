//! In-memory data store
//!
//! Behaves like a strict backend: writes naming a column the schema lacks, or
//! an enum value the schema does not list, fail with
//! [`RepoError::SchemaMismatch`]. Tests use [`MemoryStore::with_schema`] to
//! stand in for older backends.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use shared::message::{ChangeAction, Resource};
use std::collections::HashMap;

use super::feed::ChangeFeed;
use super::query::RowQuery;
use super::schema::{BackendSchema, SchemaContract, TableSchema};
use super::{DataStore, RepoError, RepoResult};

#[derive(Debug)]
pub struct MemoryStore {
    schema: BackendSchema,
    rows: RwLock<HashMap<Resource, Vec<Value>>>,
    feed: ChangeFeed,
}

impl MemoryStore {
    /// Store with the full contract schema
    pub fn new(feed_capacity: usize) -> Self {
        Self::with_schema(
            BackendSchema::from_contract(&SchemaContract::current()),
            feed_capacity,
        )
    }

    pub fn with_schema(schema: BackendSchema, feed_capacity: usize) -> Self {
        Self {
            schema,
            rows: RwLock::new(HashMap::new()),
            feed: ChangeFeed::new(feed_capacity),
        }
    }

    /// Insert a raw row without schema checks or change events (test fixtures)
    pub fn seed(&self, resource: Resource, row: Value) {
        self.rows.write().entry(resource).or_default().push(row);
    }

    fn table(&self, resource: Resource) -> RepoResult<&TableSchema> {
        self.schema.table(resource).ok_or_else(|| {
            RepoError::SchemaMismatch(format!("relation \"{}\" does not exist", resource))
        })
    }

    fn check_row(&self, resource: Resource, row: &Value) -> RepoResult<()> {
        let table = self.table(resource)?;
        let obj = row
            .as_object()
            .ok_or_else(|| RepoError::Validation("row must be a JSON object".into()))?;
        for (column, value) in obj {
            if !table.has_column(column) {
                return Err(RepoError::SchemaMismatch(format!(
                    "column \"{}\" of relation \"{}\" does not exist",
                    column, resource
                )));
            }
            if !table.accepts(column, value) {
                return Err(RepoError::SchemaMismatch(format!(
                    "invalid input value for enum {}.{}: {}",
                    resource, column, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(super::feed::DEFAULT_FEED_CAPACITY)
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, resource: Resource, query: &RowQuery) -> RepoResult<Vec<Value>> {
        self.table(resource)?;
        let guard = self.rows.read();
        let mut rows: Vec<Value> = guard
            .get(&resource)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();
        drop(guard);
        query.apply_order_and_limit(&mut rows);
        Ok(rows)
    }

    async fn insert(&self, resource: Resource, row: Value) -> RepoResult<Value> {
        self.check_row(resource, &row)?;
        let id = row
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| RepoError::Validation("row is missing id".into()))?
            .to_string();

        {
            let mut guard = self.rows.write();
            let rows = guard.entry(resource).or_default();
            if rows
                .iter()
                .any(|r| r.get("id").and_then(Value::as_str) == Some(id.as_str()))
            {
                return Err(RepoError::Duplicate(format!("{}:{}", resource, id)));
            }
            rows.push(row.clone());
        }

        self.feed.publish_row(resource, ChangeAction::Created, &row);
        Ok(row)
    }

    async fn update(
        &self,
        resource: Resource,
        query: &RowQuery,
        patch: Value,
    ) -> RepoResult<Vec<Value>> {
        self.check_row(resource, &patch)?;
        let Some(fields) = patch.as_object() else {
            return Err(RepoError::Validation("patch must be a JSON object".into()));
        };

        let updated: Vec<Value> = {
            let mut guard = self.rows.write();
            let rows = guard.entry(resource).or_default();
            let mut updated = Vec::new();
            for row in rows.iter_mut().filter(|r| query.matches(r)) {
                if let Some(obj) = row.as_object_mut() {
                    for (key, value) in fields {
                        obj.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
            updated
        };

        for row in &updated {
            self.feed.publish_row(resource, ChangeAction::Updated, row);
        }
        Ok(updated)
    }

    async fn describe(&self) -> RepoResult<BackendSchema> {
        Ok(self.schema.clone())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{}/{}", bucket, path.trim_start_matches('/'))
    }

    fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
}
