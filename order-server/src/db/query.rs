//! Row query builder
//!
//! A small, backend-neutral description of "which rows": tenant scope, column
//! filters, ordering and limit. [`MemoryStore`](super::memory::MemoryStore)
//! evaluates it directly with [`RowQuery::matches`]; the REST adapter renders
//! it as PostgREST query parameters with [`RowQuery::to_params`].

use serde_json::Value;
use std::cmp::Ordering;

/// Column filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    Neq(String, Value),
    In(String, Vec<Value>),
    Gt(String, Value),
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Tenant-scoped row selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowQuery {
    pub workspace_id: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Option<(String, SortOrder)>,
    pub limit: Option<usize>,
}

impl RowQuery {
    /// Rows of one workspace
    pub fn workspace(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: Some(workspace_id.into()),
            ..Default::default()
        }
    }

    /// Rows across all workspaces (background polling only)
    pub fn all() -> Self {
        Self::default()
    }

    /// Single row by id inside a workspace
    pub fn by_id(workspace_id: impl Into<String>, id: impl Into<String>) -> Self {
        let id: String = id.into();
        Self::workspace(workspace_id).eq("id", id)
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    pub fn neq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Neq(column.to_string(), value.into()));
        self
    }

    pub fn in_list<V: Into<Value>>(mut self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.filters.push(Filter::In(column.to_string(), values));
        self
    }

    pub fn gt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gt(column.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, column: &str, order: SortOrder) -> Self {
        self.order = Some((column.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate the tenant scope and filters against one row
    pub fn matches(&self, row: &Value) -> bool {
        if let Some(ws) = &self.workspace_id
            && row.get("workspace_id").and_then(Value::as_str) != Some(ws.as_str())
        {
            return false;
        }

        self.filters.iter().all(|filter| match filter {
            Filter::Eq(col, expected) => {
                compare(row.get(col).unwrap_or(&Value::Null), expected) == Some(Ordering::Equal)
            }
            Filter::Neq(col, expected) => {
                compare(row.get(col).unwrap_or(&Value::Null), expected) != Some(Ordering::Equal)
            }
            Filter::In(col, values) => {
                let actual = row.get(col).unwrap_or(&Value::Null);
                values
                    .iter()
                    .any(|v| compare(actual, v) == Some(Ordering::Equal))
            }
            Filter::Gt(col, bound) => {
                compare(row.get(col).unwrap_or(&Value::Null), bound) == Some(Ordering::Greater)
            }
        })
    }

    /// Sort and truncate rows according to `order` and `limit`
    pub fn apply_order_and_limit(&self, rows: &mut Vec<Value>) {
        if let Some((col, order)) = &self.order {
            rows.sort_by(|a, b| {
                let ord = compare(
                    a.get(col).unwrap_or(&Value::Null),
                    b.get(col).unwrap_or(&Value::Null),
                )
                .unwrap_or(Ordering::Equal);
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
    }

    /// Render as PostgREST query parameters
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(ws) = &self.workspace_id {
            params.push(("workspace_id".to_string(), format!("eq.{}", ws)));
        }
        for filter in &self.filters {
            let (col, value) = match filter {
                Filter::Eq(col, v) => (col, format!("eq.{}", param_value(v))),
                Filter::Neq(col, v) => (col, format!("neq.{}", param_value(v))),
                Filter::Gt(col, v) => (col, format!("gt.{}", param_value(v))),
                Filter::In(col, values) => {
                    let list = values
                        .iter()
                        .map(|v| match v {
                            Value::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
                            other => param_value(other),
                        })
                        .collect::<Vec<_>>()
                        .join(",");
                    (col, format!("in.({})", list))
                }
            };
            params.push((col.clone(), value));
        }
        if let Some((col, order)) = &self.order {
            let dir = match order {
                SortOrder::Asc => "asc",
                SortOrder::Desc => "desc",
            };
            params.push(("order".to_string(), format!("{}.{}", col, dir)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

fn param_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Compare two JSON scalars; numbers numerically, strings lexically
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}
