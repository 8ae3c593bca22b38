use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::keyspace::EntityKind;
use crate::reference::{CompanyRef, DomainRef};

/// Behaviour shared by every entity stored in the ledger.
///
/// Values are encoded as UTF-8 JSON objects. Decoding is lenient: missing
/// fields take their default value, so a record that was never written (or
/// was written by something else) decodes to a mostly-empty value instead of
/// failing. [`Entity::resolves_as`] is the predicate that tells a real record
/// apart from such a husk.
pub trait Entity: Serialize + DeserializeOwned + Default + Clone {
    /// Which key space this entity lives in.
    const KIND: EntityKind;

    /// The entity's own identifier.
    fn id(&self) -> &str;

    /// Returns `true` if this decoded value represents a live record for
    /// `requested_id`.
    fn resolves_as(&self, requested_id: &str) -> bool;

    /// Encode to the ledger's value representation.
    fn to_bytes(&self) -> TypeResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| TypeError::Encode {
            kind: Self::KIND.as_str(),
            reason: e.to_string(),
        })
    }

    /// Decode from the ledger's value representation.
    fn from_bytes(bytes: &[u8]) -> TypeResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Decode {
            kind: Self::KIND.as_str(),
            reason: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// An organisational domain an employee works in.
///
/// Domains are soft-disabled, never deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Domain {
    #[serde(rename = "docType")]
    pub doc_type: String,
    pub id: String,
    pub domain_name: String,
    pub enabled: bool,
}

impl Domain {
    /// A freshly created, enabled domain.
    pub fn new(id: impl Into<String>, domain_name: impl Into<String>) -> Self {
        Self {
            doc_type: EntityKind::Domain.doc_type().into(),
            id: id.into(),
            domain_name: domain_name.into(),
            enabled: true,
        }
    }
}

impl Entity for Domain {
    const KIND: EntityKind = EntityKind::Domain;

    fn id(&self) -> &str {
        &self.id
    }

    fn resolves_as(&self, _requested_id: &str) -> bool {
        !self.domain_name.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Company
// ---------------------------------------------------------------------------

/// A company an employee is assigned to. Same lifecycle as [`Domain`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "docType")]
    pub doc_type: String,
    pub id: String,
    pub company_name: String,
    pub enabled: bool,
}

impl Company {
    /// A freshly created, enabled company.
    pub fn new(id: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            doc_type: EntityKind::Company.doc_type().into(),
            id: id.into(),
            company_name: company_name.into(),
            enabled: true,
        }
    }
}

impl Entity for Company {
    const KIND: EntityKind = EntityKind::Company;

    fn id(&self) -> &str {
        &self.id
    }

    fn resolves_as(&self, _requested_id: &str) -> bool {
        !self.company_name.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Employee
// ---------------------------------------------------------------------------

/// A tracked employee.
///
/// `domain` and `company` are snapshots of the referenced records taken at
/// creation or transfer time. The default value is the empty snapshot used
/// for deletions in the audit history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "docType")]
    pub doc_type: String,
    pub id: String,
    pub employee_name: String,
    pub designation: String,
    #[serde(alias = "Dob")]
    pub dob: String,
    pub domain: DomainRef,
    pub company: CompanyRef,
}

impl Employee {
    pub fn new(
        id: impl Into<String>,
        employee_name: impl Into<String>,
        designation: impl Into<String>,
        dob: impl Into<String>,
        domain: DomainRef,
        company: CompanyRef,
    ) -> Self {
        Self {
            doc_type: EntityKind::Employee.doc_type().into(),
            id: id.into(),
            employee_name: employee_name.into(),
            designation: designation.into(),
            dob: dob.into(),
            domain,
            company,
        }
    }

    /// Returns `true` for the empty snapshot (no id, no fields).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Entity for Employee {
    const KIND: EntityKind = EntityKind::Employee;

    fn id(&self) -> &str {
        &self.id
    }

    fn resolves_as(&self, requested_id: &str) -> bool {
        self.id == requested_id
    }
}
