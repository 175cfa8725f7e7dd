//! Dining table management

use serde_json::{Map, Value};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use shared::session::StaffSession;
use shared::util::new_id;

use crate::db::DbService;
use crate::db::repository::DiningTableRepository;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone)]
pub struct TableService {
    tables: DiningTableRepository,
}

impl TableService {
    pub fn new(db: DbService) -> Self {
        Self {
            tables: DiningTableRepository::new(db),
        }
    }

    pub async fn list(&self, staff: &StaffSession) -> AppResult<Vec<DiningTable>> {
        staff.require_admin()?;
        Ok(self.tables.find_all(&staff.workspace_id).await?)
    }

    /// Create a table; numbers are unique per workspace
    pub async fn create(&self, staff: &StaffSession, payload: DiningTableCreate) -> AppResult<DiningTable> {
        staff.require_admin()?;
        validate_payload(&payload)?;
        if self
            .tables
            .find_by_number(&staff.workspace_id, payload.table_number)
            .await?
            .is_some()
        {
            return Err(AppError::new(ErrorCode::TableNumberExists)
                .with_detail("table_number", payload.table_number));
        }

        let table = DiningTable {
            id: new_id(),
            workspace_id: staff.workspace_id.clone(),
            table_number: payload.table_number,
            label: payload.label,
            capacity: payload.capacity,
            is_active: true,
        };
        let table = self.tables.create(&table).await?;
        tracing::info!(table_id = %table.id, table_number = table.table_number, "Dining table created");
        Ok(table)
    }

    pub async fn update(
        &self,
        staff: &StaffSession,
        id: &str,
        payload: DiningTableUpdate,
    ) -> AppResult<DiningTable> {
        staff.require_admin()?;
        validate_payload(&payload)?;
        if self.tables.find_by_id(&staff.workspace_id, id).await?.is_none() {
            return Err(AppError::new(ErrorCode::TableNotFound).with_detail("table_id", id));
        }

        let mut patch = Map::new();
        if let Some(label) = payload.label {
            patch.insert("label".into(), Value::from(label));
        }
        if let Some(capacity) = payload.capacity {
            patch.insert("capacity".into(), Value::from(capacity));
        }
        if let Some(is_active) = payload.is_active {
            patch.insert("is_active".into(), Value::from(is_active));
        }
        Ok(self
            .tables
            .update(&staff.workspace_id, id, Value::Object(patch))
            .await?)
    }
}
