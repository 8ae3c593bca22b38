//! Ledger adapter contract for Roster.
//!
//! Roster runs on top of an ordered, versioned key-value ledger that keeps
//! the full history of every key. This crate defines the narrow contract the
//! rest of the workspace consumes and ships an in-memory ledger that honours
//! it.
//!
//! # Contract
//!
//! - [`LedgerState`]: per-invocation view: `get`, `put`, `delete`,
//!   `range_scan`, `history_of`
//! - [`TransactionalLedger`]: opens a transaction and commits it atomically
//! - [`KvCursor`] / [`HistoryCursor`]: scan results that release their
//!   cursor slot when dropped
//!
//! # Backends
//!
//! - [`InMemoryLedger`]: `BTreeMap`-backed ledger for tests, the CLI and the
//!   HTTP host
//!
//! # Design Rules
//!
//! 1. Keys iterate in ascending byte order.
//! 2. Writes made through a transaction become visible to other readers only
//!    when the transaction commits; dropping it discards them.
//! 3. Every committed write to a key appends one history entry.
//! 4. The store never interprets values.

pub mod cursor;
pub mod error;
pub mod memory;
pub mod traits;

pub use cursor::{
    Cursor, CursorGuard, CursorTracker, HistoryCursor, HistoryEntry, KeyValue, KvCursor,
};
pub use error::{StoreError, StoreResult};
pub use memory::{CommitReceipt, InMemoryLedger, LedgerTransaction};
pub use traits::{LedgerState, TransactionalLedger};
