//! Entity registry for Roster.
//!
//! Sits between the dispatcher and the ledger and owns every business rule:
//! argument sanitation, existence and uniqueness checks, relational
//! consistency between employees and the domains and companies they
//! reference, and name-based authorization of mutations.
//!
//! # Key Types
//!
//! - [`AssetRegistry`]: creation, transfer, disable and delete operations
//! - [`QueryService`]: range listings, aggregate read, audit history
//! - [`Authorizer`]: authorization capability; [`NameMatchAuthorizer`] is the default
//! - [`RegistryError`] / [`ErrorKind`]: error taxonomy shared by hosts
//!
//! # Design Rules
//!
//! 1. The ledger is the only state. Nothing is cached between calls.
//! 2. Single-entity lookups are strict; bulk listings skip records that do
//!    not decode.
//! 3. Employees hold snapshot references. Renaming a domain or company never
//!    rewrites the employees that point at it.
//! 4. Domains and companies are disabled, never deleted.

pub mod auth;
pub mod config;
pub mod error;
pub mod query;
pub mod read;
pub mod registry;
pub mod validation;

pub use auth::{Authorizer, NameMatchAuthorizer};
pub use config::RegistryConfig;
pub use error::{Action, ErrorKind, RegistryError, RegistryResult};
pub use query::{AllEntities, AuditEntry, QueryService, RangeRecord};
pub use registry::{AssetRegistry, NewEmployee};
