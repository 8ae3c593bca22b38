use crate::cursor::{HistoryCursor, KvCursor};
use crate::error::StoreResult;
use crate::memory::CommitReceipt;

/// The ledger as seen by one invocation.
///
/// All implementations must satisfy these invariants:
/// - `get` of a key that was never written, or was deleted, returns
///   `Ok(None)`.
/// - `range_scan(start, end)` yields rows with `start <= key < end` in
///   ascending key order; an empty `end` means unbounded.
/// - `history_of` yields committed modifications oldest first, deletions
///   included as tombstones.
/// - Keys and values are opaque; the ledger never interprets values.
pub trait LedgerState: Send + Sync {
    /// Read the current value of a key.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Create or overwrite a key.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Remove a key. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> StoreResult<()>;

    /// Scan the half-open range `[start, end)`.
    fn range_scan(&self, start: &str, end: &str) -> StoreResult<KvCursor>;

    /// Replay every committed modification of `key`.
    fn history_of(&self, key: &str) -> StoreResult<HistoryCursor>;
}

impl<T: LedgerState + ?Sized> LedgerState for &T {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn range_scan(&self, start: &str, end: &str) -> StoreResult<KvCursor> {
        (**self).range_scan(start, end)
    }

    fn history_of(&self, key: &str) -> StoreResult<HistoryCursor> {
        (**self).history_of(key)
    }
}

/// A ledger that groups an invocation's writes into one atomic commit.
///
/// A transaction that is dropped instead of committed leaves no trace.
pub trait TransactionalLedger: Send + Sync {
    type Tx: LedgerState;

    /// Open a transaction over the current committed state.
    fn begin(&self) -> StoreResult<Self::Tx>;

    /// Apply all of the transaction's writes at once.
    fn commit(&self, tx: Self::Tx) -> StoreResult<CommitReceipt>;
}
