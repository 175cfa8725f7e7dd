//! Session Extractors
//!
//! Build the request-scoped session objects from headers. Handlers take the
//! session they need as an argument and pass it to every operation.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use shared::session::{CustomerSession, StaffRole, StaffSession};

use crate::utils::{AppError, ErrorCode};

pub const WORKSPACE_HEADER: &str = "x-workspace-id";
pub const TABLE_HEADER: &str = "x-table-number";
pub const CUSTOMER_NAME_HEADER: &str = "x-customer-name";
pub const CUSTOMER_PHONE_HEADER: &str = "x-customer-phone";
pub const STAFF_ROLE_HEADER: &str = "x-staff-role";

/// Tenant of the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentWorkspace(pub String);

/// Customer session (table QR code)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentCustomer(pub CustomerSession);

/// Staff session (kitchen display / admin console)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentStaff(pub StaffSession);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<std::borrow::Cow<'a, str>> {
    parts
        .headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
        .filter(|value| !value.trim().is_empty())
}

fn workspace_id(parts: &Parts) -> Result<String, AppError> {
    header(parts, WORKSPACE_HEADER)
        .map(|ws| ws.trim().to_string())
        .ok_or_else(|| {
            tracing::warn!(uri = %parts.uri, "Request without workspace");
            AppError::tenant_not_selected()
        })
}

fn staff_role(parts: &Parts) -> Result<Option<StaffRole>, AppError> {
    match header(parts, STAFF_ROLE_HEADER) {
        None => Ok(None),
        Some(value) => StaffRole::parse(&value).map(Some).ok_or_else(|| {
            tracing::warn!(uri = %parts.uri, role = %value, "Unknown staff role");
            AppError::new(ErrorCode::RoleRequired).with_detail("role", value.into_owned())
        }),
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentWorkspace {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        workspace_id(parts).map(CurrentWorkspace)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentCustomer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<CustomerSession>() {
            return Ok(CurrentCustomer(session.clone()));
        }

        let workspace_id = workspace_id(parts)?;
        let table_number = header(parts, TABLE_HEADER)
            .ok_or_else(AppError::not_authenticated)?
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                AppError::validation("Invalid table number").with_detail("field", TABLE_HEADER)
            })?;
        let name = header(parts, CUSTOMER_NAME_HEADER).unwrap_or_default();
        let phone = header(parts, CUSTOMER_PHONE_HEADER).unwrap_or_default();

        let session = CustomerSession::new(workspace_id, table_number, name, phone);
        parts.extensions.insert(session.clone());
        Ok(CurrentCustomer(session))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentStaff {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<StaffSession>() {
            return Ok(CurrentStaff(session.clone()));
        }

        let workspace_id = workspace_id(parts)?;
        let role = staff_role(parts)?.ok_or_else(|| {
            tracing::warn!(uri = %parts.uri, "Staff route without staff role");
            AppError::not_authenticated()
        })?;

        let session = StaffSession::new(workspace_id, role);
        parts.extensions.insert(session.clone());
        Ok(CurrentStaff(session))
    }
}

/// `Option<CurrentStaff>`: absent role header means "not staff", a bad one is rejected
impl<S: Send + Sync> OptionalFromRequestParts<S> for CurrentStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if staff_role(parts)?.is_none() {
            return Ok(None);
        }
        <CurrentStaff as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/orders");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_customer_session_from_headers() {
        let mut parts = parts(&[
            (WORKSPACE_HEADER, "ws-1"),
            (TABLE_HEADER, "7"),
            (CUSTOMER_NAME_HEADER, " Meera "),
            (CUSTOMER_PHONE_HEADER, "98765 43210"),
        ]);
        let CurrentCustomer(session) =
            <CurrentCustomer as FromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .unwrap();
        assert_eq!(session.workspace_id, "ws-1");
        assert_eq!(session.table_number, 7);
        assert_eq!(session.customer_name, "Meera");
        assert_eq!(session.customer_phone, "9876543210");
    }

    #[tokio::test]
    async fn test_missing_workspace_rejected() {
        let mut parts = parts(&[(TABLE_HEADER, "7")]);
        let err = <CurrentCustomer as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TenantNotSelected);
    }

    #[tokio::test]
    async fn test_bad_table_number_rejected() {
        let mut parts = parts(&[(WORKSPACE_HEADER, "ws-1"), (TABLE_HEADER, "abc")]);
        let err = <CurrentCustomer as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_staff_session() {
        let mut parts = parts(&[(WORKSPACE_HEADER, "ws-1"), (STAFF_ROLE_HEADER, "Kitchen")]);
        let CurrentStaff(session) =
            <CurrentStaff as FromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .unwrap();
        assert_eq!(session.role, StaffRole::Kitchen);

        let mut parts = parts_without_role();
        let err = <CurrentStaff as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    fn parts_without_role() -> Parts {
        parts(&[(WORKSPACE_HEADER, "ws-1")])
    }

    #[tokio::test]
    async fn test_optional_staff() {
        let mut none = parts_without_role();
        let staff = <CurrentStaff as OptionalFromRequestParts<()>>::from_request_parts(&mut none, &())
            .await
            .unwrap();
        assert!(staff.is_none());

        let mut bad = parts(&[(WORKSPACE_HEADER, "ws-1"), (STAFF_ROLE_HEADER, "waiter")]);
        let err = <CurrentStaff as OptionalFromRequestParts<()>>::from_request_parts(&mut bad, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
    }
}
