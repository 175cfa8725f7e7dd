//! Backend schema contract
//!
//! The server validates the backend schema once at startup against a versioned
//! [`SchemaContract`]. Missing required tables or columns abort startup; missing
//! optional columns switch the matching capability off and the repositories
//! stop writing those fields. The backend's `payment_method` enum decides which
//! payment methods can be stored.
//!
//! ```text
//! DataStore::describe() ──▶ BackendSchema ──▶ SchemaContract::validate()
//!                                                   │
//!                                      Ok(SchemaCapabilities) / Err(SchemaError)
//! ```

use serde_json::Value;
use shared::message::Resource;
use shared::order::PaymentMethod;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

use super::RepoError;

/// Contract version implemented by this server
pub const SCHEMA_VERSION: u32 = 3;

/// Oldest backend schema version still accepted
pub const MIN_SCHEMA_VERSION: u32 = 2;

/// Schema validation errors (startup only)
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Backend schema version {found} is older than required {required}")]
    VersionTooOld { found: u32, required: u32 },

    #[error("Backend is missing table: {0}")]
    MissingTable(String),

    #[error("Table {table} is missing required columns: {columns:?}")]
    MissingColumns { table: String, columns: Vec<String> },

    #[error("Default payment method '{0}' is not supported by the backend")]
    DefaultPaymentMethodUnsupported(PaymentMethod),

    #[error("Failed to describe backend schema: {0}")]
    Describe(#[from] RepoError),
}

/// Columns and enum values of one backend table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSchema {
    pub columns: BTreeSet<String>,
    /// Enum-typed columns and their allowed values
    pub enums: HashMap<String, Vec<String>>,
}

impl TableSchema {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Check an enum column value (non-enum columns accept anything)
    pub fn accepts(&self, column: &str, value: &Value) -> bool {
        match (self.enums.get(column), value) {
            (None, _) | (_, Value::Null) => true,
            (Some(allowed), Value::String(s)) => allowed.iter().any(|a| a == s),
            (Some(_), _) => false,
        }
    }
}

/// Schema as reported by the backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendSchema {
    /// Declared schema version, if the backend publishes one
    pub version: Option<u32>,
    pub tables: HashMap<String, TableSchema>,
}

impl BackendSchema {
    /// Full schema matching the contract (all optional columns present)
    pub fn from_contract(contract: &SchemaContract) -> Self {
        let tables = contract
            .tables
            .iter()
            .map(|t| {
                let columns = t
                    .required
                    .iter()
                    .chain(t.optional.iter())
                    .map(|c| c.to_string())
                    .collect();
                let enums = t
                    .enums
                    .iter()
                    .map(|(col, values)| {
                        (col.to_string(), values.iter().map(|v| v.to_string()).collect())
                    })
                    .collect();
                (t.resource.table_name().to_string(), TableSchema { columns, enums })
            })
            .collect();

        Self {
            version: Some(contract.version),
            tables,
        }
    }

    pub fn table(&self, resource: Resource) -> Option<&TableSchema> {
        self.tables.get(resource.table_name())
    }

    pub fn table_mut(&mut self, resource: Resource) -> Option<&mut TableSchema> {
        self.tables.get_mut(resource.table_name())
    }

    /// Drop a column (simulates an older backend)
    pub fn without_column(mut self, resource: Resource, column: &str) -> Self {
        if let Some(table) = self.table_mut(resource) {
            table.columns.remove(column);
            table.enums.remove(column);
        }
        self
    }

    /// Restrict the allowed values of an enum column
    pub fn with_enum(mut self, resource: Resource, column: &str, values: &[&str]) -> Self {
        if let Some(table) = self.table_mut(resource) {
            table.enums.insert(
                column.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            );
        }
        self
    }
}

/// Expected shape of one table
#[derive(Debug, Clone)]
pub struct TableContract {
    pub resource: Resource,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub enums: &'static [(&'static str, &'static [&'static str])],
}

const ORDER_STATUS_VALUES: &[&str] = &["PENDING", "PREPARING", "READY", "COMPLETED", "CANCELLED"];
const PAYMENT_STATUS_VALUES: &[&str] = &["UNPAID", "PAID"];
const PAYMENT_METHOD_VALUES: &[&str] = &["cash", "card", "upi", "online"];

/// Versioned schema contract
#[derive(Debug, Clone)]
pub struct SchemaContract {
    pub version: u32,
    pub min_version: u32,
    pub tables: Vec<TableContract>,
}

impl SchemaContract {
    /// The contract this server is built against
    pub fn current() -> Self {
        Self {
            version: SCHEMA_VERSION,
            min_version: MIN_SCHEMA_VERSION,
            tables: vec![
                TableContract {
                    resource: Resource::Order,
                    required: &[
                        "id",
                        "workspace_id",
                        "table_number",
                        "customer_name",
                        "customer_phone",
                        "items",
                        "total_amount",
                        "status",
                        "payment_status",
                        "created_at",
                    ],
                    optional: &["payment_method", "status_reason", "updated_at"],
                    enums: &[
                        ("status", ORDER_STATUS_VALUES),
                        ("payment_status", PAYMENT_STATUS_VALUES),
                        ("payment_method", PAYMENT_METHOD_VALUES),
                    ],
                },
                TableContract {
                    resource: Resource::FinalBill,
                    required: &[
                        "id",
                        "workspace_id",
                        "table_number",
                        "customer_phone",
                        "order_ids",
                        "items",
                        "total_amount",
                        "is_paid",
                        "created_at",
                    ],
                    optional: &["customer_name", "paid_at", "payment_method"],
                    enums: &[("payment_method", PAYMENT_METHOD_VALUES)],
                },
                TableContract {
                    resource: Resource::MenuItem,
                    required: &["id", "workspace_id", "name", "price", "is_available"],
                    optional: &["category_id", "description", "image_url", "sort_order"],
                    enums: &[],
                },
                TableContract {
                    resource: Resource::Category,
                    required: &["id", "workspace_id", "name"],
                    optional: &["sort_order", "is_active"],
                    enums: &[],
                },
                TableContract {
                    resource: Resource::DiningTable,
                    required: &["id", "workspace_id", "table_number"],
                    optional: &["label", "capacity", "is_active"],
                    enums: &[],
                },
                TableContract {
                    resource: Resource::ServiceRequest,
                    required: &["id", "workspace_id", "table_number", "kind", "status", "created_at"],
                    optional: &["note", "resolved_at"],
                    enums: &[],
                },
            ],
        }
    }

    /// Validate a backend schema and derive the capabilities
    pub fn validate(&self, schema: &BackendSchema) -> Result<SchemaCapabilities, SchemaError> {
        if let Some(found) = schema.version
            && found < self.min_version
        {
            return Err(SchemaError::VersionTooOld {
                found,
                required: self.min_version,
            });
        }

        let mut missing_optional: HashMap<Resource, BTreeSet<String>> = HashMap::new();

        for contract in &self.tables {
            let table_name = contract.resource.table_name();
            let table = schema
                .tables
                .get(table_name)
                .ok_or_else(|| SchemaError::MissingTable(table_name.to_string()))?;

            let missing: Vec<String> = contract
                .required
                .iter()
                .filter(|c| !table.has_column(c))
                .map(|c| c.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(SchemaError::MissingColumns {
                    table: table_name.to_string(),
                    columns: missing,
                });
            }

            let absent: BTreeSet<String> = contract
                .optional
                .iter()
                .filter(|c| !table.has_column(c))
                .map(|c| c.to_string())
                .collect();
            if !absent.is_empty() {
                tracing::warn!(
                    table = table_name,
                    columns = ?absent,
                    "Backend lacks optional columns, capability disabled"
                );
                missing_optional.insert(contract.resource, absent);
            }
        }

        let payment_methods = schema
            .table(Resource::Order)
            .filter(|t| t.has_column("payment_method"))
            .map(|t| match t.enums.get("payment_method") {
                Some(values) => PaymentMethod::ALL
                    .into_iter()
                    .filter(|m| values.iter().any(|v| v == m.as_str()))
                    .collect(),
                None => PaymentMethod::ALL.to_vec(),
            })
            .unwrap_or_default();

        Ok(SchemaCapabilities {
            version: schema.version.unwrap_or(self.version),
            missing_optional,
            payment_methods,
        })
    }
}

/// What the connected backend can store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaCapabilities {
    pub version: u32,
    missing_optional: HashMap<Resource, BTreeSet<String>>,
    /// Payment methods the backend enum accepts (empty if the column is absent)
    payment_methods: Vec<PaymentMethod>,
}

impl SchemaCapabilities {
    /// Capabilities of a backend matching the contract exactly
    pub fn full() -> Self {
        Self {
            version: SCHEMA_VERSION,
            missing_optional: HashMap::new(),
            payment_methods: PaymentMethod::ALL.to_vec(),
        }
    }

    pub fn supports_column(&self, resource: Resource, column: &str) -> bool {
        self.missing_optional
            .get(&resource)
            .is_none_or(|cols| !cols.contains(column))
    }

    /// Whether orders can record a payment method at all
    pub fn records_payment_method(&self) -> bool {
        self.supports_column(Resource::Order, "payment_method")
    }

    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    pub fn supports_payment_method(&self, method: PaymentMethod) -> bool {
        self.payment_methods.contains(&method)
    }

    /// The fallback method must itself be storable
    pub fn check_default_payment_method(&self, method: PaymentMethod) -> Result<(), SchemaError> {
        if self.records_payment_method() && !self.supports_payment_method(method) {
            return Err(SchemaError::DefaultPaymentMethodUnsupported(method));
        }
        Ok(())
    }

    /// Remove fields the backend cannot store from an outgoing row
    pub fn strip_unsupported(&self, resource: Resource, row: &mut Value) {
        if let (Some(missing), Some(obj)) = (self.missing_optional.get(&resource), row.as_object_mut()) {
            obj.retain(|key, _| !missing.contains(key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_schema_validates() {
        let contract = SchemaContract::current();
        let caps = contract
            .validate(&BackendSchema::from_contract(&contract))
            .unwrap();
        assert_eq!(caps, SchemaCapabilities::full());
    }

    #[test]
    fn test_missing_required_column_fails_fast() {
        let contract = SchemaContract::current();
        let schema =
            BackendSchema::from_contract(&contract).without_column(Resource::Order, "payment_status");
        match contract.validate(&schema) {
            Err(SchemaError::MissingColumns { table, columns }) => {
                assert_eq!(table, "orders");
                assert_eq!(columns, vec!["payment_status".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_table_fails() {
        let contract = SchemaContract::current();
        let mut schema = BackendSchema::from_contract(&contract);
        schema.tables.remove("final_bills");
        assert!(matches!(
            contract.validate(&schema),
            Err(SchemaError::MissingTable(t)) if t == "final_bills"
        ));
    }

    #[test]
    fn test_old_version_rejected() {
        let contract = SchemaContract::current();
        let mut schema = BackendSchema::from_contract(&contract);
        schema.version = Some(1);
        assert!(matches!(
            contract.validate(&schema),
            Err(SchemaError::VersionTooOld { found: 1, .. })
        ));
    }

    #[test]
    fn test_missing_optional_column_disables_capability() {
        let contract = SchemaContract::current();
        let schema =
            BackendSchema::from_contract(&contract).without_column(Resource::Order, "status_reason");
        let caps = contract.validate(&schema).unwrap();
        assert!(!caps.supports_column(Resource::Order, "status_reason"));
        assert!(caps.supports_column(Resource::Order, "payment_method"));

        let mut row = json!({"id": "o1", "status_reason": "x", "status": "PENDING"});
        caps.strip_unsupported(Resource::Order, &mut row);
        assert_eq!(row, json!({"id": "o1", "status": "PENDING"}));
    }

    #[test]
    fn test_payment_enum_restricts_methods() {
        let contract = SchemaContract::current();
        let schema = BackendSchema::from_contract(&contract).with_enum(
            Resource::Order,
            "payment_method",
            &["cash", "card"],
        );
        let caps = contract.validate(&schema).unwrap();
        assert_eq!(caps.payment_methods(), &[PaymentMethod::Cash, PaymentMethod::Card]);
        assert!(!caps.supports_payment_method(PaymentMethod::Upi));
        assert!(caps.check_default_payment_method(PaymentMethod::Cash).is_ok());
        assert!(caps.check_default_payment_method(PaymentMethod::Online).is_err());
    }

    #[test]
    fn test_payment_column_absent() {
        let contract = SchemaContract::current();
        let schema =
            BackendSchema::from_contract(&contract).without_column(Resource::Order, "payment_method");
        let caps = contract.validate(&schema).unwrap();
        assert!(!caps.records_payment_method());
        assert!(caps.payment_methods().is_empty());
        assert!(caps.check_default_payment_method(PaymentMethod::Upi).is_ok());
    }
}
