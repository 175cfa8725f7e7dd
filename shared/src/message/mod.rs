//! 变更通知消息类型定义
//!
//! 这些类型在 order-server 和客户端之间共享。每次经由数据服务写入的行都会
//! 产生一条 [`ChangeEvent`]，订阅方按工作区和桌号过滤。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend resource (one table in the data service)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Order,
    FinalBill,
    MenuItem,
    Category,
    DiningTable,
    ServiceRequest,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Order,
        Resource::FinalBill,
        Resource::MenuItem,
        Resource::Category,
        Resource::DiningTable,
        Resource::ServiceRequest,
    ];

    /// Table name in the backend data service
    pub fn table_name(self) -> &'static str {
        match self {
            Resource::Order => "orders",
            Resource::FinalBill => "final_bills",
            Resource::MenuItem => "menu_items",
            Resource::Category => "categories",
            Resource::DiningTable => "tables",
            Resource::ServiceRequest => "service_requests",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// 变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

/// Row change notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub workspace_id: String,
    pub resource: Resource,
    pub action: ChangeAction,
    /// 资源 ID
    pub id: String,
    /// 桌号 (仅桌台相关资源)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
    /// Per workspace+resource version, increments on every change
    pub version: u64,
    /// 资源数据 (deleted 时为 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Subscription filter: tenant is mandatory, table and resource are optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFilter {
    pub workspace_id: String,
    #[serde(default)]
    pub resource: Option<Resource>,
    #[serde(default)]
    pub table_number: Option<i32>,
}

impl ChangeFilter {
    pub fn workspace(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            resource: None,
            table_number: None,
        }
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn with_table(mut self, table_number: i32) -> Self {
        self.table_number = Some(table_number);
        self
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if event.workspace_id != self.workspace_id {
            return false;
        }
        if let Some(resource) = self.resource
            && resource != event.resource
        {
            return false;
        }
        match self.table_number {
            Some(table) => event.table_number == Some(table),
            None => true,
        }
    }
}
