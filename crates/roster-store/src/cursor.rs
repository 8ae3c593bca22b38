//! Scan results and cursor accounting.
//!
//! A [`Cursor`] is the closable sequence returned by range scans and history
//! lookups. It holds a [`CursorGuard`] for its whole lifetime; the guard is
//! released when the cursor is dropped, whether iteration finished, stopped
//! early, or bailed out on an error.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use roster_types::TxId;

use crate::error::StoreResult;

/// One row of a range scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One committed modification of a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub tx_id: TxId,
    pub timestamp: DateTime<Utc>,
    /// `None` marks a deletion (tombstone).
    pub value: Option<Vec<u8>>,
}

impl HistoryEntry {
    pub fn is_delete(&self) -> bool {
        self.value.is_none()
    }
}

// ---------------------------------------------------------------------------
// Cursor accounting
// ---------------------------------------------------------------------------

/// Counts the cursors a ledger has handed out and not yet seen dropped.
#[derive(Clone, Debug, Default)]
pub struct CursorTracker {
    open: Arc<AtomicUsize>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new open cursor.
    pub fn acquire(&self) -> CursorGuard {
        self.open.fetch_add(1, Ordering::SeqCst);
        CursorGuard {
            open: Arc::clone(&self.open),
        }
    }

    /// Number of cursors currently open.
    pub fn open_cursors(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

/// Slot held by a live cursor. Released on drop.
#[derive(Debug)]
pub struct CursorGuard {
    open: Arc<AtomicUsize>,
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Closable, ordered sequence of scan results.
pub struct Cursor<T> {
    rows: Box<dyn Iterator<Item = StoreResult<T>> + Send>,
    _guard: Option<CursorGuard>,
}

/// Cursor over `(key, value)` rows in ascending key order.
pub type KvCursor = Cursor<KeyValue>;

/// Cursor over a key's history, oldest first.
pub type HistoryCursor = Cursor<HistoryEntry>;

impl<T: Send + 'static> Cursor<T> {
    /// Wrap an arbitrary row source.
    pub fn new<I>(rows: I, guard: Option<CursorGuard>) -> Self
    where
        I: Iterator<Item = StoreResult<T>> + Send + 'static,
    {
        Self {
            rows: Box::new(rows),
            _guard: guard,
        }
    }

    /// Cursor over rows already materialised in memory.
    pub fn from_rows(rows: Vec<T>, guard: Option<CursorGuard>) -> Self {
        Self::new(rows.into_iter().map(Ok), guard)
    }

    /// Release the cursor explicitly. Equivalent to dropping it.
    pub fn close(self) {}
}

impl<T> Iterator for Cursor<T> {
    type Item = StoreResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

impl<T> std::fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("guarded", &self._guard.is_some())
            .finish()
    }
}
