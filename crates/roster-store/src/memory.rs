use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use chrono::{DateTime, Utc};
use roster_types::{KeyRange, TxId};

use crate::cursor::{CursorTracker, HistoryCursor, HistoryEntry, KeyValue, KvCursor};
use crate::error::{validate_key, StoreError, StoreResult};
use crate::traits::{LedgerState, TransactionalLedger};

/// Pending writes of a transaction. `None` is a deletion.
type WriteSet = BTreeMap<String, Option<Vec<u8>>>;

/// Summary of a committed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitReceipt {
    pub tx_id: TxId,
    pub timestamp: DateTime<Utc>,
    /// Number of keys modified.
    pub writes: usize,
}

#[derive(Default)]
struct LedgerData {
    state: BTreeMap<String, Vec<u8>>,
    history: HashMap<String, Vec<HistoryEntry>>,
    tx_count: u64,
}

/// In-memory versioned ledger for tests, the CLI and the HTTP host.
///
/// Current values live in a `BTreeMap` so range scans come out in key order.
/// Every committed write also appends to the key's history. Cloning the
/// ledger yields another handle onto the same state.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    inner: Arc<RwLock<LedgerData>>,
    cursors: CursorTracker,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_state()?.state.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of transactions committed so far.
    pub fn tx_count(&self) -> StoreResult<u64> {
        Ok(self.read_state()?.tx_count)
    }

    /// Cursors handed out by this ledger or its transactions and not yet
    /// dropped.
    pub fn open_cursors(&self) -> usize {
        self.cursors.open_cursors()
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, LedgerData>> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn apply(&self, writes: WriteSet) -> StoreResult<CommitReceipt> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let tx_id = TxId::new();
        let timestamp = Utc::now();
        let mut applied = 0;

        for (key, value) in writes {
            match &value {
                Some(bytes) => {
                    inner.state.insert(key.clone(), bytes.clone());
                }
                None => {
                    // Deleting a key that holds no value leaves no tombstone.
                    if inner.state.remove(&key).is_none() {
                        continue;
                    }
                }
            }
            inner.history.entry(key).or_default().push(HistoryEntry {
                tx_id: tx_id.clone(),
                timestamp,
                value,
            });
            applied += 1;
        }
        inner.tx_count += 1;

        tracing::debug!(tx = %tx_id.short_id(), writes = applied, "committed transaction");
        Ok(CommitReceipt {
            tx_id,
            timestamp,
            writes: applied,
        })
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedger")
            .field("key_count", &self.len().ok())
            .field("tx_count", &self.tx_count().ok())
            .finish()
    }
}

fn checked_range(start: &str, end: &str) -> StoreResult<KeyRange> {
    let range = KeyRange::new(start, end);
    if range.is_inverted() {
        return Err(StoreError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(range)
}

fn committed_range(
    state: &BTreeMap<String, Vec<u8>>,
    range: &KeyRange,
) -> BTreeMap<String, Vec<u8>> {
    let upper = if range.is_unbounded() {
        Bound::Unbounded
    } else {
        Bound::Excluded(range.end.as_str())
    };
    state
        .range::<str, _>((Bound::Included(range.start.as_str()), upper))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn into_rows(rows: BTreeMap<String, Vec<u8>>) -> Vec<KeyValue> {
    rows.into_iter().map(|(key, value)| KeyValue { key, value }).collect()
}

// ---------------------------------------------------------------------------
// Auto-commit access
// ---------------------------------------------------------------------------

/// Direct access outside a transaction: reads see committed state and every
/// write commits on its own.
impl LedgerState for InMemoryLedger {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.read_state()?.state.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        validate_key(key)?;
        self.apply(WriteSet::from([(key.to_string(), Some(value.to_vec()))]))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.apply(WriteSet::from([(key.to_string(), None)]))?;
        Ok(())
    }

    fn range_scan(&self, start: &str, end: &str) -> StoreResult<KvCursor> {
        let range = checked_range(start, end)?;
        let rows = committed_range(&self.read_state()?.state, &range);
        Ok(KvCursor::from_rows(into_rows(rows), Some(self.cursors.acquire())))
    }

    fn history_of(&self, key: &str) -> StoreResult<HistoryCursor> {
        let entries = self.read_state()?.history.get(key).cloned().unwrap_or_default();
        Ok(HistoryCursor::from_rows(entries, Some(self.cursors.acquire())))
    }
}

impl TransactionalLedger for InMemoryLedger {
    type Tx = LedgerTransaction;

    fn begin(&self) -> StoreResult<LedgerTransaction> {
        Ok(LedgerTransaction {
            inner: Arc::clone(&self.inner),
            writes: RwLock::new(WriteSet::new()),
            cursors: self.cursors.clone(),
        })
    }

    fn commit(&self, tx: LedgerTransaction) -> StoreResult<CommitReceipt> {
        if !Arc::ptr_eq(&self.inner, &tx.inner) {
            return Err(StoreError::ForeignTransaction);
        }
        let writes = tx.writes.into_inner().map_err(|_| StoreError::LockPoisoned)?;
        self.apply(writes)
    }
}

// ---------------------------------------------------------------------------
// LedgerTransaction
// ---------------------------------------------------------------------------

/// One invocation's view of an [`InMemoryLedger`].
///
/// Writes are buffered in an overlay that this transaction's own reads and
/// scans see. History only reflects committed transactions.
pub struct LedgerTransaction {
    inner: Arc<RwLock<LedgerData>>,
    writes: RwLock<WriteSet>,
    cursors: CursorTracker,
}

impl LedgerTransaction {
    /// Number of keys this transaction would modify.
    pub fn pending_writes(&self) -> StoreResult<usize> {
        self.writes
            .read()
            .map(|w| w.len())
            .map_err(|_| StoreError::LockPoisoned)
    }

    fn stage(&self, key: &str, value: Option<Vec<u8>>) -> StoreResult<()> {
        validate_key(key)?;
        self.writes
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .insert(key.to_string(), value);
        Ok(())
    }
}

impl LedgerState for LedgerTransaction {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let writes = self.writes.read().map_err(|_| StoreError::LockPoisoned)?;
        if let Some(pending) = writes.get(key) {
            return Ok(pending.clone());
        }
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.state.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.stage(key, Some(value.to_vec()))
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.stage(key, None)
    }

    fn range_scan(&self, start: &str, end: &str) -> StoreResult<KvCursor> {
        let range = checked_range(start, end)?;
        let mut rows = {
            let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
            committed_range(&inner.state, &range)
        };
        let writes = self.writes.read().map_err(|_| StoreError::LockPoisoned)?;
        for (key, value) in writes.iter().filter(|(k, _)| range.contains(k)) {
            match value {
                Some(bytes) => {
                    rows.insert(key.clone(), bytes.clone());
                }
                None => {
                    rows.remove(key);
                }
            }
        }
        Ok(KvCursor::from_rows(into_rows(rows), Some(self.cursors.acquire())))
    }

    fn history_of(&self, key: &str) -> StoreResult<HistoryCursor> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        let entries = inner.history.get(key).cloned().unwrap_or_default();
        Ok(HistoryCursor::from_rows(entries, Some(self.cursors.acquire())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(cursor: KvCursor) -> Vec<String> {
        cursor.map(|row| row.unwrap().key).collect()
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    #[test]
    fn committed_writes_become_visible() {
        let ledger = InMemoryLedger::new();
        let tx = ledger.begin().unwrap();
        tx.put("k", b"v").unwrap();
        assert!(ledger.get("k").unwrap().is_none());

        let receipt = ledger.commit(tx).unwrap();
        assert_eq!(receipt.writes, 1);
        assert_eq!(ledger.get("k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(ledger.tx_count().unwrap(), 1);
    }

    #[test]
    fn dropped_transaction_leaves_no_trace() {
        let ledger = InMemoryLedger::new();
        {
            let tx = ledger.begin().unwrap();
            tx.put("k", b"v").unwrap();
            assert_eq!(tx.pending_writes().unwrap(), 1);
        }
        assert!(ledger.is_empty().unwrap());
        assert_eq!(ledger.tx_count().unwrap(), 0);
        assert_eq!(ledger.history_of("k").unwrap().count(), 0);
    }

    #[test]
    fn transaction_reads_its_own_writes() {
        let ledger = InMemoryLedger::new();
        ledger.put("a", b"old").unwrap();

        let tx = ledger.begin().unwrap();
        tx.put("a", b"new").unwrap();
        tx.delete("b").unwrap();
        assert_eq!(tx.get("a").unwrap(), Some(b"new".to_vec()));
        assert!(tx.get("b").unwrap().is_none());
    }

    #[test]
    fn transaction_scan_merges_overlay() {
        let ledger = InMemoryLedger::new();
        ledger.put("d1", b"1").unwrap();
        ledger.put("d3", b"3").unwrap();

        let tx = ledger.begin().unwrap();
        tx.put("d2", b"2").unwrap();
        tx.delete("d3").unwrap();
        tx.put("x9", b"outside").unwrap();

        assert_eq!(keys(tx.range_scan("d0", "d9").unwrap()), vec!["d1", "d2"]);
    }

    #[test]
    fn foreign_transaction_rejected() {
        let a = InMemoryLedger::new();
        let b = InMemoryLedger::new();
        let tx = a.begin().unwrap();
        tx.put("k", b"v").unwrap();
        assert_eq!(b.commit(tx).unwrap_err(), StoreError::ForeignTransaction);
    }

    #[test]
    fn cloned_handle_shares_state() {
        let ledger = InMemoryLedger::new();
        let handle = ledger.clone();
        let tx = handle.begin().unwrap();
        tx.put("k", b"v").unwrap();
        ledger.commit(tx).unwrap();
        assert_eq!(handle.get("k").unwrap(), Some(b"v".to_vec()));
    }

    // -----------------------------------------------------------------------
    // Range scans
    // -----------------------------------------------------------------------

    #[test]
    fn scan_is_ordered_and_half_open() {
        let ledger = InMemoryLedger::new();
        for key in ["c2", "c1", "c10", "d1", "c9"] {
            ledger.put(key, b"x").unwrap();
        }
        assert_eq!(
            keys(ledger.range_scan("c1", "c9").unwrap()),
            vec!["c1", "c10", "c2"]
        );
    }

    #[test]
    fn empty_end_is_unbounded() {
        let ledger = InMemoryLedger::new();
        ledger.put("a", b"x").unwrap();
        ledger.put("zz", b"x").unwrap();
        assert_eq!(keys(ledger.range_scan("b", "").unwrap()), vec!["zz"]);
    }

    #[test]
    fn inverted_range_rejected() {
        let ledger = InMemoryLedger::new();
        let err = ledger.range_scan("z", "a").unwrap_err();
        assert!(matches!(err, StoreError::InvalidRange { .. }));
    }

    #[test]
    fn cursors_released_after_scans() {
        let ledger = InMemoryLedger::new();
        ledger.put("a", b"1").unwrap();
        ledger.put("b", b"2").unwrap();

        let mut cursor = ledger.range_scan("a", "").unwrap();
        assert_eq!(ledger.open_cursors(), 1);
        cursor.next();
        drop(cursor);

        let tx = ledger.begin().unwrap();
        let _ = tx.range_scan("a", "").unwrap().count();
        let _ = tx.history_of("a").unwrap().count();
        assert_eq!(ledger.open_cursors(), 0);
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    #[test]
    fn history_records_every_commit_oldest_first() {
        let ledger = InMemoryLedger::new();
        ledger.put("e1", b"v1").unwrap();
        ledger.put("e1", b"v2").unwrap();
        ledger.delete("e1").unwrap();

        let history: Vec<HistoryEntry> =
            ledger.history_of("e1").unwrap().map(Result::unwrap).collect();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].value.as_deref(), Some(&b"v1"[..]));
        assert_eq!(history[1].value.as_deref(), Some(&b"v2"[..]));
        assert!(history[2].is_delete());
        assert_ne!(history[0].tx_id, history[2].tx_id);
    }

    #[test]
    fn deleting_absent_key_leaves_no_tombstone() {
        let ledger = InMemoryLedger::new();
        ledger.delete("ghost").unwrap();
        assert_eq!(ledger.history_of("ghost").unwrap().count(), 0);
    }

    #[test]
    fn one_transaction_one_tx_id() {
        let ledger = InMemoryLedger::new();
        let tx = ledger.begin().unwrap();
        tx.put("a", b"1").unwrap();
        tx.put("b", b"2").unwrap();
        let receipt = ledger.commit(tx).unwrap();

        let a = ledger.history_of("a").unwrap().next().unwrap().unwrap();
        let b = ledger.history_of("b").unwrap().next().unwrap().unwrap();
        assert_eq!(a.tx_id, receipt.tx_id);
        assert_eq!(b.tx_id, receipt.tx_id);
    }

    #[test]
    fn pending_writes_not_in_history() {
        let ledger = InMemoryLedger::new();
        let tx = ledger.begin().unwrap();
        tx.put("k", b"v").unwrap();
        assert_eq!(tx.history_of("k").unwrap().count(), 0);
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    #[test]
    fn empty_key_rejected() {
        let ledger = InMemoryLedger::new();
        assert!(matches!(
            ledger.put("", b"v"),
            Err(StoreError::InvalidKey { .. })
        ));
        let tx = ledger.begin().unwrap();
        assert!(matches!(tx.delete(""), Err(StoreError::InvalidKey { .. })));
    }

    #[test]
    fn nul_key_rejected() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.put("a\0b", b"v").is_err());
    }

    #[test]
    fn debug_format() {
        let ledger = InMemoryLedger::new();
        ledger.put("k", b"v").unwrap();
        let debug = format!("{ledger:?}");
        assert!(debug.contains("InMemoryLedger"));
        assert!(debug.contains("key_count"));
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let ledger = InMemoryLedger::new();
        ledger.put("k", b"v").unwrap();

        let handle = ledger.clone();
        let _ = std::thread::spawn(move || {
            let _guard = handle.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert_eq!(ledger.len(), Err(StoreError::LockPoisoned));
        assert_eq!(ledger.is_empty(), Err(StoreError::LockPoisoned));
        assert_eq!(ledger.tx_count(), Err(StoreError::LockPoisoned));
        assert!(ledger.get("k").is_err());
    }
}
