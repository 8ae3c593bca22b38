//! Foundation types for Roster.
//!
//! This crate provides the entity model shared by every other Roster crate:
//! the three tracked entity kinds, the denormalized references that link
//! them, the key spaces they occupy in the ledger, and the identifiers the
//! ledger assigns to committed transactions.
//!
//! # Key Types
//!
//! - [`Employee`], [`Domain`], [`Company`]: the tracked entities
//! - [`DomainRef`], [`CompanyRef`]: snapshot references held by an employee
//! - [`Entity`]: JSON codec and existence predicate shared by all entities
//! - [`EntityKind`], [`KeyRange`]: per-kind key spaces used for listing
//! - [`TxId`]: UUID v7 transaction identifier

pub mod entity;
pub mod error;
pub mod keyspace;
pub mod reference;
pub mod tx;

pub use entity::{Company, Domain, Employee, Entity};
pub use error::{TypeError, TypeResult};
pub use keyspace::{EntityKind, KeyRange};
pub use reference::{CompanyRef, DomainRef};
pub use tx::TxId;
