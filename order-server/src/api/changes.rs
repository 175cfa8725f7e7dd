//! 变更通知 (Server-Sent Events)
//!
//! `GET /api/changes?table_number=&resource=` streams [`ChangeEvent`]s of the
//! request's workspace. Table devices pass their table number; staff screens
//! usually subscribe to the whole workspace.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{Router, routing::get};
use futures::Stream;
use serde::Deserialize;
use shared::message::{ChangeEvent, ChangeFilter, Resource};

use crate::auth::CurrentWorkspace;
use crate::core::ServerState;
use crate::db::ChangeSubscription;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/changes", get(subscribe))
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeQuery {
    pub table_number: Option<i32>,
    pub resource: Option<Resource>,
}

impl ChangeQuery {
    fn into_filter(self, workspace_id: String) -> ChangeFilter {
        let mut filter = ChangeFilter::workspace(workspace_id);
        if let Some(table) = self.table_number {
            filter = filter.with_table(table);
        }
        if let Some(resource) = self.resource {
            filter = filter.with_resource(resource);
        }
        filter
    }
}

async fn subscribe(
    State(state): State<ServerState>,
    CurrentWorkspace(workspace_id): CurrentWorkspace,
    Query(query): Query<ChangeQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let filter = query.into_filter(workspace_id);
    tracing::debug!(workspace_id = %filter.workspace_id, table_number = ?filter.table_number, "Change subscriber connected");
    let subscription = state.db.feed().subscribe(filter);
    Sse::new(event_stream(subscription)).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

fn event_stream(subscription: ChangeSubscription) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold(subscription, |mut subscription| async move {
        let event = subscription.recv().await?;
        Some((Ok(to_sse(&event)), subscription))
    })
}

fn to_sse(event: &ChangeEvent) -> Event {
    let sse = Event::default()
        .event(event.resource.table_name())
        .id(event.version.to_string());
    match serde_json::to_string(event) {
        Ok(json) => sse.data(json),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode change event");
            sse.comment("encode error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builds_filter() {
        let filter = ChangeQuery {
            table_number: Some(4),
            resource: Some(Resource::Order),
        }
        .into_filter("ws".into());
        assert_eq!(filter.workspace_id, "ws");
        assert_eq!(filter.table_number, Some(4));
        assert_eq!(filter.resource, Some(Resource::Order));

        let filter = ChangeQuery::default().into_filter("ws".into());
        assert_eq!(filter, ChangeFilter::workspace("ws"));
    }
}
