//! Database Module
//!
//! The backend data service is an external collaborator that provides row
//! CRUD, a schema description, public object URLs and change notifications.
//! This module abstracts it behind [`DataStore`]:
//!
//! - [`memory::MemoryStore`] - 内存实现 (tests, local development)
//! - [`rest::RestStore`] - PostgREST-style REST adapter (reqwest)
//!
//! [`DbService`] pairs a store with the [`SchemaCapabilities`] validated at
//! startup; typed repositories in [`repository`] go through it.

pub mod feed;
pub mod memory;
pub mod query;
pub mod repository;
pub mod rest;
pub mod schema;

pub use feed::{ChangeFeed, ChangeSubscription};
pub use memory::MemoryStore;
pub use query::{Filter, RowQuery, SortOrder};
pub use rest::RestStore;
pub use schema::{BackendSchema, SchemaCapabilities, SchemaContract, SchemaError};

use async_trait::async_trait;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::message::Resource;
use std::sync::Arc;
use thiserror::Error;

use crate::core::config::{BackendKind, Config};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Serialization(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => AppError::not_found(what),
            RepoError::Duplicate(what) => AppError::already_exists(what),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::SchemaMismatch(msg) => AppError::with_message(ErrorCode::SchemaMismatch, msg),
            RepoError::Network(msg) => AppError::with_message(ErrorCode::NetworkError, msg),
            RepoError::Database(msg) | RepoError::Serialization(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Backend data service contract
///
/// Rows are JSON objects; every row carries `workspace_id`. Writes publish
/// change events on the store's [`ChangeFeed`].
#[async_trait]
pub trait DataStore: Send + Sync + std::fmt::Debug {
    /// Rows matching the query
    async fn select(&self, resource: Resource, query: &RowQuery) -> RepoResult<Vec<Value>>;

    /// Insert one row and return it as stored
    async fn insert(&self, resource: Resource, row: Value) -> RepoResult<Value>;

    /// Patch every row matching the query, returning the updated rows
    async fn update(&self, resource: Resource, query: &RowQuery, patch: Value)
    -> RepoResult<Vec<Value>>;

    /// Describe tables, columns and enum values
    async fn describe(&self) -> RepoResult<BackendSchema>;

    /// Public URL of a stored object
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Change notifications for writes through this store
    fn feed(&self) -> &ChangeFeed;
}

/// Database service - store + validated capabilities
#[derive(Debug, Clone)]
pub struct DbService {
    store: Arc<dyn DataStore>,
    caps: Arc<SchemaCapabilities>,
    poller: Option<Arc<RestStore>>,
}

impl DbService {
    /// Build the configured store and validate its schema
    pub async fn connect(config: &Config) -> Result<Self, SchemaError> {
        match config.backend.kind {
            BackendKind::Memory => {
                tracing::info!("Using in-memory backend");
                let store = MemoryStore::new(config.feed_capacity);
                Self::new(Arc::new(store)).await
            }
            BackendKind::Rest => {
                let store = Arc::new(
                    RestStore::new(&config.backend, config.feed_capacity)
                        .map_err(SchemaError::Describe)?,
                );
                tracing::info!(url = %config.backend.url, "Using REST backend");
                let mut service = Self::new(store.clone()).await?;
                service.poller = Some(store);
                Ok(service)
            }
        }
    }

    /// Validate a store's schema once and wrap it
    pub async fn new(store: Arc<dyn DataStore>) -> Result<Self, SchemaError> {
        let schema = store.describe().await?;
        let caps = SchemaContract::current().validate(&schema)?;
        tracing::info!(
            schema_version = caps.version,
            payment_methods = ?caps.payment_methods(),
            "Backend schema validated"
        );
        Ok(Self {
            store,
            caps: Arc::new(caps),
            poller: None,
        })
    }

    pub fn store(&self) -> &dyn DataStore {
        self.store.as_ref()
    }

    pub fn caps(&self) -> &SchemaCapabilities {
        &self.caps
    }

    pub fn feed(&self) -> &ChangeFeed {
        self.store.feed()
    }

    /// Start the REST change poller, if this backend needs one
    pub fn start_polling(&self, interval: std::time::Duration) {
        if let Some(store) = &self.poller {
            store.clone().spawn_poller(interval);
        }
    }
}
