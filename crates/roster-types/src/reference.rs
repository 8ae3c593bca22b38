//! Denormalized references from an employee to its domain and company.
//!
//! A reference is a snapshot: the id of the target plus a copy of its display
//! name taken when the employee was created or last transferred. It is not a
//! live foreign key and is never re-validated on read.

use serde::{Deserialize, Serialize};

use crate::entity::{Company, Domain};

/// Snapshot of a [`Domain`] held by an employee.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomainRef {
    pub id: String,
    pub domain_name: String,
}

impl DomainRef {
    pub fn new(id: impl Into<String>, domain_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain_name: domain_name.into(),
        }
    }

    /// Capture the current id and name of a live domain record.
    pub fn snapshot(domain: &Domain) -> Self {
        Self::new(domain.id.clone(), domain.domain_name.clone())
    }
}

/// Snapshot of a [`Company`] held by an employee.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyRef {
    pub id: String,
    pub company_name: String,
}

impl CompanyRef {
    pub fn new(id: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            company_name: company_name.into(),
        }
    }

    /// Capture the current id and name of a live company record.
    pub fn snapshot(company: &Company) -> Self {
        Self::new(company.id.clone(), company.company_name.clone())
    }
}
