/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines a Transaction Context for a single chaincode invocation. It is the only way chaincode
//! functions reach world state.
//!
//! Reads go to the transaction's own writes first ('read-your-write' semantics), then to values
//! already read in this transaction, then to world state. Every first-hand read records the
//! version it observed into the [ReadWriteSet]. Writes are buffered in the set and reach world
//! state only when the runtime commits the transaction.

use std::{cell::RefCell, collections::HashMap};

use crate::{
    error::ChaincodeError,
    read_write_set::ReadWriteSet,
    storage::{StateEntry, StateIterator, Value, WorldStateStorage},
};

/// TransactionContext encapsulates access to world state for one transaction.
pub struct TransactionContext<'a, S>
where
    S: WorldStateStorage + ?Sized,
{
    /// World State services as the data source
    ws: &'a S,
    tx_id: String,
    /// reads caches values obtained from world state in this transaction
    reads: RefCell<HashMap<String, Option<Value>>>,
    rw_set: RefCell<ReadWriteSet>,
}

impl<'a, S> TransactionContext<'a, S>
where
    S: WorldStateStorage + ?Sized,
{
    pub fn new(ws: &'a S, tx_id: String) -> Self {
        Self {
            ws,
            tx_id,
            reads: RefCell::new(HashMap::new()),
            rw_set: RefCell::new(ReadWriteSet::default()),
        }
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// Value at `key`, None if absent.
    pub fn get_state(&self, key: &str) -> Result<Option<Value>, ChaincodeError> {
        // 1. Return the value that was written earlier in the transaction
        if let Some(value) = self.rw_set.borrow().written(key) {
            return Ok(Some(value.clone()));
        }

        // 2. Return the value that was read earlier in the transaction
        if let Some(value) = self.reads.borrow().get(key) {
            return Ok(value.clone());
        }

        // 3. Get the value from world state
        let versioned = self.ws.get(key).map_err(ChaincodeError::StoreRead)?;
        let (value, version) = match versioned {
            Some(v) => (Some(v.value), v.version),
            None => (None, 0),
        };

        // 4. Cache to reads
        self.rw_set.borrow_mut().record_read(key, version);
        self.reads
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(value)
    }

    /// Buffer a write of `value` at `key`. The key must not be empty.
    pub fn put_state(&mut self, key: &str, value: Value) -> Result<(), ChaincodeError> {
        if key.is_empty() {
            return Err(ChaincodeError::InvalidArgument(
                "key must not be empty".to_string(),
            ));
        }
        self.rw_set.get_mut().record_write(key, value);
        Ok(())
    }

    /// Cursor over committed entries with `start <= key < end`. Writes buffered by this
    /// transaction are not visible to the scan.
    pub fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<ScanCursor<'_>, ChaincodeError> {
        let inner = self
            .ws
            .range_scan(start, end)
            .map_err(ChaincodeError::StoreRead)?;
        Ok(ScanCursor {
            inner: Some(inner),
            rw_set: &self.rw_set,
        })
    }

    /// Discard the changes to world state
    pub fn revert_changes(&mut self) {
        self.reads.get_mut().clear();
        self.rw_set.get_mut().clear();
    }

    /// Consumes self to output the read-write set, ready to be committed.
    pub fn into_read_write_set(self) -> ReadWriteSet {
        self.rw_set.into_inner()
    }
}

/// Scoped range cursor. The underlying store cursor is closed once iteration is exhausted,
/// after the first error, or when the cursor is dropped, whichever comes first.
pub struct ScanCursor<'c> {
    inner: Option<Box<dyn StateIterator + 'c>>,
    rw_set: &'c RefCell<ReadWriteSet>,
}

impl<'c> ScanCursor<'c> {
    /// Release the store cursor. Calling it more than once is a no-op.
    pub fn close(&mut self) -> Result<(), ChaincodeError> {
        match self.inner.take() {
            Some(mut inner) => inner.close().map_err(ChaincodeError::StoreRead),
            None => Ok(()),
        }
    }

    fn close_quietly(&mut self) {
        if let Err(error) = self.close() {
            tracing::warn!(%error, "failed to close range cursor");
        }
    }
}

impl<'c> Iterator for ScanCursor<'c> {
    type Item = Result<StateEntry, ChaincodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.inner.as_mut()?.next();
        match next {
            Some(Ok(entry)) => {
                self.rw_set
                    .borrow_mut()
                    .record_read(&entry.key, entry.version);
                Some(Ok(entry))
            }
            Some(Err(error)) => {
                self.close_quietly();
                Some(Err(ChaincodeError::StoreRead(error)))
            }
            None => {
                self.close_quietly();
                None
            }
        }
    }
}

impl<'c> Drop for ScanCursor<'c> {
    fn drop(&mut self) {
        self.close_quietly();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::{MemoryStorage, StorageError, VersionedValue};

    /// Store whose cursors yield one entry and then fail.
    #[derive(Default)]
    struct FailingStorage {
        closes: AtomicUsize,
    }

    struct FailingCursor<'a> {
        yielded: usize,
        closes: &'a AtomicUsize,
    }

    impl Iterator for FailingCursor<'_> {
        type Item = Result<StateEntry, StorageError>;

        fn next(&mut self) -> Option<Self::Item> {
            self.yielded += 1;
            match self.yielded {
                1 => Some(Ok(StateEntry {
                    key: "1".to_string(),
                    value: b"v".to_vec(),
                    version: 3,
                })),
                2 => Some(Err(StorageError::Unavailable("disk".to_string()))),
                _ => Some(Ok(StateEntry {
                    key: "2".to_string(),
                    value: b"v".to_vec(),
                    version: 4,
                })),
            }
        }
    }

    impl StateIterator for FailingCursor<'_> {
        fn close(&mut self) -> Result<(), StorageError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl WorldStateStorage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<VersionedValue>, StorageError> {
            Ok(None)
        }

        fn put(&self, _key: &str, _value: Value) -> Result<(), StorageError> {
            Ok(())
        }

        fn range_scan<'a>(
            &'a self,
            _start: &str,
            _end: &str,
        ) -> Result<Box<dyn StateIterator + 'a>, StorageError> {
            Ok(Box::new(FailingCursor {
                yielded: 0,
                closes: &self.closes,
            }))
        }
    }

    #[test]
    fn test_read_your_writes() {
        let storage = MemoryStorage::new();
        storage.put("a", b"committed".to_vec()).unwrap();

        let mut ctx = TransactionContext::new(&storage, "tx".to_string());
        assert_eq!(ctx.get_state("a").unwrap(), Some(b"committed".to_vec()));

        ctx.put_state("a", b"pending".to_vec()).unwrap();
        assert_eq!(ctx.get_state("a").unwrap(), Some(b"pending".to_vec()));
        // world state is untouched until commit
        assert_eq!(storage.get("a").unwrap().unwrap().value, b"committed".to_vec());

        let rw_set = ctx.into_read_write_set();
        assert_eq!(rw_set.reads().get("a"), Some(&1));
        assert_eq!(rw_set.written("a"), Some(&b"pending".to_vec()));
    }

    #[test]
    fn test_absent_read_records_version_zero() {
        let storage = MemoryStorage::new();
        let ctx = TransactionContext::new(&storage, "tx".to_string());
        assert_eq!(ctx.get_state("missing").unwrap(), None);
        assert_eq!(ctx.into_read_write_set().reads().get("missing"), Some(&0));
    }

    #[test]
    fn test_empty_key_rejected() {
        let storage = MemoryStorage::new();
        let mut ctx = TransactionContext::new(&storage, "tx".to_string());
        assert!(matches!(
            ctx.put_state("", b"v".to_vec()),
            Err(ChaincodeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_revert_changes() {
        let storage = MemoryStorage::new();
        let mut ctx = TransactionContext::new(&storage, "tx".to_string());
        ctx.put_state("a", b"v".to_vec()).unwrap();
        ctx.revert_changes();
        assert_eq!(ctx.get_state("a").unwrap(), None);
        assert!(ctx.into_read_write_set().is_read_only());
    }

    #[test]
    fn test_scan_cursor_released_on_every_path() {
        let storage = MemoryStorage::new();
        for key in ["1", "2", "3"] {
            storage.put(key, key.as_bytes().to_vec()).unwrap();
        }
        let ctx = TransactionContext::new(&storage, "tx".to_string());

        // exhausted
        let keys: Vec<String> = ctx
            .get_state_by_range("", "")
            .unwrap()
            .map(|entry| entry.unwrap().key)
            .collect();
        assert_eq!(keys, vec!["1", "2", "3"]);
        assert_eq!(storage.open_cursors(), 0);

        // early termination
        {
            let mut cursor = ctx.get_state_by_range("", "").unwrap();
            assert!(cursor.next().is_some());
            assert_eq!(storage.open_cursors(), 1);
        }
        assert_eq!(storage.open_cursors(), 0);

        // explicit close, then drop
        let mut cursor = ctx.get_state_by_range("2", "").unwrap();
        cursor.close().unwrap();
        assert!(cursor.next().is_none());
        drop(cursor);
        assert_eq!(storage.open_cursors(), 0);

        let rw_set = ctx.into_read_write_set();
        assert_eq!(rw_set.reads().len(), 3);
    }

    #[test]
    fn test_scan_cursor_closed_on_store_error() {
        let storage = FailingStorage::default();
        let ctx = TransactionContext::new(&storage, "tx".to_string());

        {
            let mut cursor = ctx.get_state_by_range("", "").unwrap();
            assert_eq!(cursor.next().unwrap().unwrap().key, "1");
            assert_eq!(storage.closes.load(Ordering::SeqCst), 0);

            assert_eq!(
                cursor.next().unwrap(),
                Err(ChaincodeError::StoreRead(StorageError::Unavailable(
                    "disk".to_string()
                )))
            );
            assert_eq!(storage.closes.load(Ordering::SeqCst), 1);

            // a failed cursor is not resumed
            assert!(cursor.next().is_none());
        }
        // dropping an already closed cursor does not close it again
        assert_eq!(storage.closes.load(Ordering::SeqCst), 1);

        let rw_set = ctx.into_read_write_set();
        assert_eq!(rw_set.reads().get("1"), Some(&3));
        assert_eq!(rw_set.reads().get("2"), None);
    }
}
