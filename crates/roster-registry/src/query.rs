//! Range listings, the filtered aggregate read and per-employee audit trail.

use chrono::{DateTime, Utc};
use roster_store::LedgerState;
use roster_types::{Company, Domain, Employee, Entity, EntityKind, KeyRange, TxId};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::RegistryResult;
use crate::read::tolerant_scan;
use crate::validation::sanitize;

/// One row of a raw range listing.
///
/// Serializes as `{"Key": ..., "Record": ...}`. The record is embedded as
/// JSON when the stored bytes parse as JSON, and as a string otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeRecord {
    pub key: String,
    pub value: Vec<u8>,
}

impl RangeRecord {
    /// The stored value as a JSON value.
    pub fn record(&self) -> serde_json::Value {
        serde_json::from_slice(&self.value).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&self.value).into_owned())
        })
    }
}

impl Serialize for RangeRecord {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut row = serializer.serialize_struct("RangeRecord", 2)?;
        row.serialize_field("Key", &self.key)?;
        row.serialize_field("Record", &self.record())?;
        row.end()
    }
}

/// Result of [`QueryService::list_all_entities`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AllEntities {
    pub employee: Vec<Employee>,
    pub domain: Vec<Domain>,
    pub company: Vec<Company>,
}

/// One committed modification of an employee record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub tx_id: TxId,
    /// The employee as written; the default (empty) employee for deletions.
    pub value: Employee,
    pub is_delete: bool,
    pub timestamp: DateTime<Utc>,
}

/// Read-only views over the ledger.
pub struct QueryService<S> {
    state: S,
}

impl<S: LedgerState> QueryService<S> {
    pub fn new(state: S) -> Self {
        Self { state }
    }

    /// Raw rows with `start <= key < end`, ascending. An empty `end` is
    /// unbounded.
    pub fn list_by_range(&self, start: &str, end: &str) -> RegistryResult<Vec<RangeRecord>> {
        let mut rows = Vec::new();
        for row in self.state.range_scan(start, end)? {
            let row = row?;
            rows.push(RangeRecord {
                key: row.key,
                value: row.value,
            });
        }
        Ok(rows)
    }

    /// Raw rows in one kind's key range.
    pub fn list_kind(&self, kind: EntityKind) -> RegistryResult<Vec<RangeRecord>> {
        let KeyRange { start, end } = kind.range();
        self.list_by_range(&start, &end)
    }

    /// Every employee, plus the enabled domains and companies.
    pub fn list_all_entities(&self) -> RegistryResult<AllEntities> {
        let employee = tolerant_scan::<Employee, S>(&self.state, &EntityKind::Employee.range())?;
        let mut domain = tolerant_scan::<Domain, S>(&self.state, &EntityKind::Domain.range())?;
        domain.retain(|d| d.enabled);
        let mut company = tolerant_scan::<Company, S>(&self.state, &EntityKind::Company.range())?;
        company.retain(|c| c.enabled);

        Ok(AllEntities {
            employee,
            domain,
            company,
        })
    }

    /// Committed history of one employee key, oldest first.
    ///
    /// An unknown id yields an empty trail.
    pub fn audit_history(&self, employee_id: &str) -> RegistryResult<Vec<AuditEntry>> {
        sanitize(&[employee_id])?;

        let mut trail = Vec::new();
        for entry in self.state.history_of(employee_id)? {
            let entry = entry?;
            let is_delete = entry.is_delete();
            let value = match entry.value.as_deref() {
                None => Employee::default(),
                Some(bytes) => Employee::from_bytes(bytes).unwrap_or_else(|e| {
                    tracing::debug!(
                        id = employee_id,
                        tx = %entry.tx_id,
                        error = %e,
                        "history value does not decode"
                    );
                    Employee::default()
                }),
            };
            trail.push(AuditEntry {
                tx_id: entry.tx_id,
                value,
                is_delete,
                timestamp: entry.timestamp,
            });
        }
        Ok(trail)
    }
}
