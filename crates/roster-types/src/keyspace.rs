//! Key spaces for each entity kind.
//!
//! All entities share one flat ledger namespace. Listing relies on each kind
//! occupying its own lexicographic key range: employees under `e`, domains
//! under `d`, companies under `c`.

use std::fmt;

use serde::{Deserialize, Serialize};

const EMPLOYEE_RANGE: (&str, &str) = ("e0", "e9999999999999999999");
const DOMAIN_RANGE: (&str, &str) = ("d0", "d9999999999999999999");
const COMPANY_RANGE: (&str, &str) = ("c0", "c9999999999999999999");

/// The three kinds of tracked entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Employee,
    Domain,
    Company,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [Self::Employee, Self::Domain, Self::Company];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Domain => "domain",
            Self::Company => "company",
        }
    }

    /// Value of the `docType` field written on records of this kind.
    pub fn doc_type(&self) -> &'static str {
        self.as_str()
    }

    /// The key range listed for this kind.
    pub fn range(&self) -> KeyRange {
        let (start, end) = match self {
            Self::Employee => EMPLOYEE_RANGE,
            Self::Domain => DOMAIN_RANGE,
            Self::Company => COMPANY_RANGE,
        };
        KeyRange::new(start, end)
    }

    /// Returns `true` if `key` falls inside this kind's listing range.
    pub fn owns_key(&self, key: &str) -> bool {
        self.range().contains(key)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A half-open key range `[start, end)`.
///
/// An empty `end` means the range is unbounded above.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRange {
    pub start: String,
    pub end: String,
}

impl KeyRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Range covering every key at or after `start`.
    pub fn starting_at(start: impl Into<String>) -> Self {
        Self::new(start, "")
    }

    pub fn is_unbounded(&self) -> bool {
        self.end.is_empty()
    }

    /// A bounded range whose end sorts before its start.
    pub fn is_inverted(&self) -> bool {
        !self.is_unbounded() && self.end < self.start
    }

    pub fn contains(&self, key: &str) -> bool {
        key >= self.start.as_str() && (self.is_unbounded() || key < self.end.as_str())
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            write!(f, "[{}, ..)", self.start)
        } else {
            write!(f, "[{}, {})", self.start, self.end)
        }
    }
}
