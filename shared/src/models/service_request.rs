//! Service Request Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 呼叫服务类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceRequestKind {
    CallWaiter,
    RequestBill,
    Water,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceRequestStatus {
    #[default]
    Open,
    Resolved,
}

/// Assistance call raised from a table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRequest {
    pub id: String,
    pub workspace_id: String,
    pub table_number: i32,
    pub kind: ServiceRequestKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub status: ServiceRequestStatus,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<i64>,
}

/// Create service request payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceRequestCreate {
    pub kind: ServiceRequestKind,
    #[validate(length(max = 200))]
    pub note: Option<String>,
}
