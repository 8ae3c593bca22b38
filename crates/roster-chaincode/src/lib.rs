//! Invocation dispatch for Roster.
//!
//! Hosts hand the dispatcher a function name and positional string
//! arguments. It resolves the name to an [`Operation`], checks the argument
//! count, opens a ledger transaction, routes the call to the registry or the
//! query service, and commits only when the call succeeds.
//!
//! # Key Types
//!
//! - [`Chaincode`]: the dispatcher
//! - [`Operation`]: closed set of accepted operations, resolved by name
//! - [`Invocation`]: function name plus arguments
//! - [`Response`]: success with an optional payload, or an error message

pub mod chaincode;
pub mod config;
pub mod error;
pub mod operation;
pub mod response;

pub use chaincode::{Chaincode, APP_VERSION_KEY, SELFTEST_KEY};
pub use config::ChaincodeConfig;
pub use error::{ChaincodeError, ChaincodeResult};
pub use operation::{Arity, Invocation, Operation};
pub use response::{wire_payload, Response, WireResponse};
