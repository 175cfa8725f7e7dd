//! Service requests (呼叫服务)
//!
//! A table can have at most one OPEN request per kind; raising the same kind
//! again returns the request that is already waiting.

use shared::models::{ServiceRequest, ServiceRequestCreate, ServiceRequestStatus};
use shared::session::{CustomerSession, StaffSession};
use shared::util::{new_id, now_millis};

use crate::db::DbService;
use crate::db::repository::{DiningTableRepository, ServiceRequestRepository};
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone)]
pub struct ServiceRequestService {
    requests: ServiceRequestRepository,
    tables: DiningTableRepository,
}

impl ServiceRequestService {
    pub fn new(db: DbService) -> Self {
        Self {
            requests: ServiceRequestRepository::new(db.clone()),
            tables: DiningTableRepository::new(db),
        }
    }

    pub async fn raise(
        &self,
        session: &CustomerSession,
        payload: ServiceRequestCreate,
    ) -> AppResult<ServiceRequest> {
        validate_payload(&payload)?;
        if self
            .tables
            .find_by_number(&session.workspace_id, session.table_number)
            .await?
            .is_none()
        {
            return Err(AppError::new(ErrorCode::TableNotFound)
                .with_detail("table_number", session.table_number));
        }

        if let Some(existing) = self
            .requests
            .find_open(&session.workspace_id, session.table_number, payload.kind)
            .await?
        {
            return Ok(existing);
        }

        let request = ServiceRequest {
            id: new_id(),
            workspace_id: session.workspace_id.clone(),
            table_number: session.table_number,
            kind: payload.kind,
            note: payload
                .note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            status: ServiceRequestStatus::Open,
            created_at: now_millis(),
            resolved_at: None,
        };
        let request = self.requests.create(&request).await?;
        tracing::info!(
            request_id = %request.id,
            table_number = request.table_number,
            kind = ?request.kind,
            "Service request raised"
        );
        Ok(request)
    }

    /// Open requests, oldest first
    pub async fn list_open(&self, staff: &StaffSession) -> AppResult<Vec<ServiceRequest>> {
        staff.require_admin()?;
        Ok(self.requests.list_open(&staff.workspace_id).await?)
    }

    /// Resolve a request; resolving twice leaves the first resolution intact
    pub async fn resolve(&self, staff: &StaffSession, id: &str) -> AppResult<ServiceRequest> {
        staff.require_admin()?;
        let request = self
            .requests
            .find_by_id(&staff.workspace_id, id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::ServiceRequestNotFound).with_detail("request_id", id)
            })?;
        if request.status == ServiceRequestStatus::Resolved {
            return Ok(request);
        }
        Ok(self
            .requests
            .resolve(&staff.workspace_id, id, now_millis())
            .await?)
    }
}
