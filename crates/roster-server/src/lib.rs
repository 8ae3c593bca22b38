//! HTTP host for Roster.
//!
//! Exposes the dispatcher at `POST /v1/invoke` and the employee registry's
//! REST API under `/api`. Registry errors are mapped to 4xx statuses by
//! kind; ledger failures are 500.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::RosterServer;
