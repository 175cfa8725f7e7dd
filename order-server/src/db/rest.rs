//! REST data store (PostgREST-style backend)
//!
//! Tables live at `{base}/rest/v1/{table}`; every request carries the `apikey`
//! header plus a bearer token. Filters are rendered by
//! [`RowQuery::to_params`]. There are no retries: a failed call surfaces as a
//! [`RepoError`] to the caller.
//!
//! The backend's own realtime channel is outside this server, so order rows are
//! polled on a fixed interval and republished on the local [`ChangeFeed`].

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use shared::message::{ChangeAction, Resource};
use shared::util::now_millis;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use super::feed::ChangeFeed;
use super::query::{RowQuery, SortOrder};
use super::schema::{BackendSchema, TableSchema};
use super::{DataStore, RepoError, RepoResult};
use crate::core::config::BackendConfig;

/// Table some deployments use to publish their schema version
const SCHEMA_VERSION_TABLE: &str = "schema_version";

/// Storage bucket path prefix for public objects
const STORAGE_PUBLIC_PATH: &str = "storage/v1/object/public";

#[derive(Debug)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    feed: ChangeFeed,
    /// `updated_at` of rows this server wrote, so the poller skips our own echoes
    seen: DashMap<String, i64>,
}

impl RestStore {
    pub fn new(config: &BackendConfig, feed_capacity: usize) -> RepoResult<Self> {
        if config.url.trim().is_empty() {
            return Err(RepoError::Validation("BACKEND_URL is not set".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| RepoError::Network(format!("HTTP client error: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            feed: ChangeFeed::new(feed_capacity),
            seen: DashMap::new(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/rest/v1/{}", self.base_url, path))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
    }

    async fn send(&self, builder: RequestBuilder) -> RepoResult<Value> {
        let resp = builder.send().await.map_err(map_transport_error)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body));
        }
        let text = resp.text().await.map_err(map_transport_error)?;
        if text.trim().is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn remember(&self, row: &Value) {
        if let (Some(id), Some(ts)) = (
            row.get("id").and_then(Value::as_str),
            row.get("updated_at").and_then(Value::as_i64),
        ) {
            self.seen.insert(id.to_string(), ts);
        }
    }

    /// Drop echo markers the poller can no longer see (`updated_at <= cursor`)
    fn forget_through(&self, cursor: i64) {
        self.seen.retain(|_, ts| *ts > cursor);
    }

    /// Poll order rows changed since the last tick and republish them
    pub fn spawn_poller(self: Arc<Self>, interval: Duration) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut cursor = now_millis();
            tracing::info!(interval_ms = interval.as_millis() as u64, "Order change poller started");
            loop {
                ticker.tick().await;
                match self.poll_orders(cursor).await {
                    Ok(next) => cursor = next,
                    Err(e) => tracing::warn!(error = %e, "Order change poll failed"),
                }
            }
        });
    }

    async fn poll_orders(&self, since: i64) -> RepoResult<i64> {
        let query = RowQuery::all()
            .gt("updated_at", since)
            .order_by("updated_at", SortOrder::Asc);
        let rows = self.select(Resource::Order, &query).await?;

        let mut cursor = since;
        for row in &rows {
            let Some(ts) = row.get("updated_at").and_then(Value::as_i64) else {
                continue;
            };
            cursor = cursor.max(ts);
            let id = row.get("id").and_then(Value::as_str).unwrap_or_default();
            if self.seen.get(id).is_some_and(|known| *known == ts) {
                continue;
            }
            self.feed.publish_row(Resource::Order, ChangeAction::Updated, row);
        }
        self.forget_through(cursor);
        if !rows.is_empty() {
            tracing::debug!(count = rows.len(), "Polled order changes");
        }
        Ok(cursor)
    }

    async fn schema_version(&self) -> RepoResult<Option<u32>> {
        let body = self
            .send(self.request(Method::GET, SCHEMA_VERSION_TABLE).query(&[
                ("select", "version"),
                ("order", "version.desc"),
                ("limit", "1"),
            ]))
            .await?;
        Ok(body
            .as_array()
            .and_then(|rows| rows.first())
            .and_then(|row| row.get("version"))
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok()))
    }
}

#[async_trait]
impl DataStore for RestStore {
    async fn select(&self, resource: Resource, query: &RowQuery) -> RepoResult<Vec<Value>> {
        let body = self
            .send(
                self.request(Method::GET, resource.table_name())
                    .query(&query.to_params()),
            )
            .await?;
        into_rows(body)
    }

    async fn insert(&self, resource: Resource, row: Value) -> RepoResult<Value> {
        let body = self
            .send(
                self.request(Method::POST, resource.table_name())
                    .header("Prefer", "return=representation")
                    .json(&row),
            )
            .await?;
        let stored = into_rows(body)?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database(format!("insert into {} returned no row", resource)))?;
        self.remember(&stored);
        self.feed.publish_row(resource, ChangeAction::Created, &stored);
        Ok(stored)
    }

    async fn update(
        &self,
        resource: Resource,
        query: &RowQuery,
        patch: Value,
    ) -> RepoResult<Vec<Value>> {
        let body = self
            .send(
                self.request(Method::PATCH, resource.table_name())
                    .query(&query.to_params())
                    .header("Prefer", "return=representation")
                    .json(&patch),
            )
            .await?;
        let rows = into_rows(body)?;
        for row in &rows {
            self.remember(row);
            self.feed.publish_row(resource, ChangeAction::Updated, row);
        }
        Ok(rows)
    }

    async fn describe(&self) -> RepoResult<BackendSchema> {
        let document = self
            .send(
                self.request(Method::GET, "")
                    .header("Accept", "application/openapi+json"),
            )
            .await?;
        let mut schema = parse_openapi(&document)?;
        if schema.tables.contains_key(SCHEMA_VERSION_TABLE) {
            schema.version = self.schema_version().await?;
        }
        Ok(schema)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            STORAGE_PUBLIC_PATH,
            bucket,
            path.trim_start_matches('/')
        )
    }

    fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
}

fn into_rows(body: Value) -> RepoResult<Vec<Value>> {
    match body {
        Value::Array(rows) => Ok(rows),
        Value::Object(_) => Ok(vec![body]),
        other => Err(RepoError::Serialization(format!(
            "expected row array, got {}",
            other
        ))),
    }
}

/// Read tables, columns and enum values from the PostgREST OpenAPI document
fn parse_openapi(document: &Value) -> RepoResult<BackendSchema> {
    let definitions = document
        .get("definitions")
        .and_then(Value::as_object)
        .ok_or_else(|| RepoError::SchemaMismatch("backend did not describe any tables".into()))?;

    let mut tables = HashMap::new();
    for (name, def) in definitions {
        let Some(props) = def.get("properties").and_then(Value::as_object) else {
            continue;
        };
        let columns: BTreeSet<String> = props.keys().cloned().collect();
        let enums = props
            .iter()
            .filter_map(|(col, prop)| {
                let values = prop.get("enum")?.as_array()?;
                let values = values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                Some((col.clone(), values))
            })
            .collect();
        tables.insert(name.clone(), TableSchema { columns, enums });
    }

    Ok(BackendSchema {
        version: None,
        tables,
    })
}

fn map_transport_error(err: reqwest::Error) -> RepoError {
    if err.is_timeout() {
        RepoError::Network(format!("request timed out: {err}"))
    } else if err.is_decode() {
        RepoError::Serialization(err.to_string())
    } else {
        RepoError::Network(err.to_string())
    }
}

/// Map a backend error response to a repository error
///
/// PGRST204 / 42703 mean an unknown column; 22P02 is an invalid enum input.
fn map_status_error(status: StatusCode, body: &str) -> RepoError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|v| v.get("code"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());

    match code {
        "PGRST204" | "42703" | "22P02" | "42P01" => return RepoError::SchemaMismatch(message),
        "23505" => return RepoError::Duplicate(message),
        "PGRST116" => return RepoError::NotFound(message),
        _ => {}
    }

    match status {
        StatusCode::NOT_FOUND => RepoError::NotFound(message),
        StatusCode::CONFLICT => RepoError::Duplicate(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => RepoError::Validation(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => RepoError::Network(message),
        _ => RepoError::Database(format!("backend error ({status}): {message}")),
    }
}
