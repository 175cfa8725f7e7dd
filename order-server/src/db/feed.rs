//! Change feed
//!
//! Every row written through a [`DataStore`](super::DataStore) is published as a
//! [`ChangeEvent`]. Subscribers pick their slice with a [`ChangeFilter`]
//! (workspace mandatory, resource and table optional).
//!
//! Versions are tracked per workspace+resource with a [`DashMap`], so clients
//! can tell stale notifications apart after reconnecting.

use dashmap::DashMap;
use serde_json::Value;
use shared::message::{ChangeAction, ChangeEvent, ChangeFilter, Resource};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default broadcast capacity
pub const DEFAULT_FEED_CAPACITY: usize = 1024;

/// Broadcast hub for row changes
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
    versions: Arc<DashMap<(String, Resource), u64>>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            versions: Arc::new(DashMap::new()),
        }
    }

    /// 递增版本号并返回新值
    fn next_version(&self, workspace_id: &str, resource: Resource) -> u64 {
        let mut entry = self
            .versions
            .entry((workspace_id.to_string(), resource))
            .or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version of a workspace+resource (0 if never changed)
    pub fn version(&self, workspace_id: &str, resource: Resource) -> u64 {
        self.versions
            .get(&(workspace_id.to_string(), resource))
            .map(|v| *v)
            .unwrap_or(0)
    }

    /// Publish a written row
    ///
    /// Rows without `workspace_id` or `id` are ignored.
    pub fn publish_row(&self, resource: Resource, action: ChangeAction, row: &Value) {
        let (Some(workspace_id), Some(id)) = (
            row.get("workspace_id").and_then(Value::as_str),
            row.get("id").and_then(Value::as_str),
        ) else {
            tracing::debug!(%resource, "Skipping change event for row without id/workspace");
            return;
        };

        let table_number = row
            .get("table_number")
            .and_then(Value::as_i64)
            .and_then(|n| i32::try_from(n).ok());

        let event = ChangeEvent {
            workspace_id: workspace_id.to_string(),
            resource,
            action,
            id: id.to_string(),
            table_number,
            version: self.next_version(workspace_id, resource),
            data: match action {
                ChangeAction::Deleted => None,
                _ => Some(row.clone()),
            },
        };

        // 没有订阅者时 send 返回 Err，属于正常情况
        let _ = self.tx.send(event);
    }

    /// Subscribe with a filter
    pub fn subscribe(&self, filter: ChangeFilter) -> ChangeSubscription {
        ChangeSubscription {
            rx: self.tx.subscribe(),
            filter,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

/// Filtered receiver
#[derive(Debug)]
pub struct ChangeSubscription {
    rx: broadcast::Receiver<ChangeEvent>,
    filter: ChangeFilter,
}

impl ChangeSubscription {
    /// Next matching event; `None` once the feed is closed
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        skipped,
                        workspace_id = %self.filter.workspace_id,
                        "Change subscriber lagged, events dropped"
                    );
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn filter(&self) -> &ChangeFilter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_subscriber_receives_only_matching_events() {
        let feed = ChangeFeed::new(16);
        let mut sub = feed.subscribe(ChangeFilter::workspace("ws-1").with_table(3));

        feed.publish_row(
            Resource::Order,
            ChangeAction::Created,
            &json!({"id": "a", "workspace_id": "ws-2", "table_number": 3}),
        );
        feed.publish_row(
            Resource::Order,
            ChangeAction::Created,
            &json!({"id": "b", "workspace_id": "ws-1", "table_number": 4}),
        );
        feed.publish_row(
            Resource::Order,
            ChangeAction::Updated,
            &json!({"id": "c", "workspace_id": "ws-1", "table_number": 3}),
        );

        let event = sub.recv().await.unwrap();
        assert_eq!(event.id, "c");
        assert_eq!(event.action, ChangeAction::Updated);
        assert_eq!(event.table_number, Some(3));
    }

    #[test]
    fn test_versions_are_per_workspace_and_resource() {
        let feed = ChangeFeed::default();
        let row = json!({"id": "x", "workspace_id": "ws-1"});
        feed.publish_row(Resource::MenuItem, ChangeAction::Updated, &row);
        feed.publish_row(Resource::MenuItem, ChangeAction::Updated, &row);
        feed.publish_row(Resource::Order, ChangeAction::Created, &row);

        assert_eq!(feed.version("ws-1", Resource::MenuItem), 2);
        assert_eq!(feed.version("ws-1", Resource::Order), 1);
        assert_eq!(feed.version("ws-2", Resource::Order), 0);
    }

    #[test]
    fn test_rows_without_ids_are_skipped() {
        let feed = ChangeFeed::default();
        feed.publish_row(Resource::Order, ChangeAction::Created, &json!({"workspace_id": "ws"}));
        assert_eq!(feed.version("ws", Resource::Order), 0);
    }
}
