/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! In-memory world state. Keys are kept in a [BTreeMap] so range scans come out in
//! lexicographic order, as they do from the host ledger. Every commit is stamped with the next
//! height, which becomes the version of each key it writes.

use std::{
    collections::BTreeMap,
    ops::Bound,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        RwLock,
    },
};

use crate::read_write_set::ReadWriteSet;

use super::{
    Key, StateEntry, StateIterator, StorageError, Value, Version, VersionedValue,
    WorldStateStorage,
};

#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<BTreeMap<Key, VersionedValue>>,
    /// height of the latest commit
    height: AtomicU64,
    /// number of range cursors handed out and not yet closed
    open_cursors: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Height of the latest commit, i.e. the version that the last written key carries.
    pub fn height(&self) -> Version {
        self.height.load(Ordering::SeqCst)
    }

    /// Number of cursors returned by [range_scan](WorldStateStorage::range_scan) that were not closed.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Number of keys in state.
    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |inner| inner.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next_version(&self) -> Version {
        self.height.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn lock_poisoned<T>(_: T) -> StorageError {
    StorageError::Unavailable("world state lock poisoned".to_string())
}

fn check_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl WorldStateStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<VersionedValue>, StorageError> {
        let inner = self.inner.read().map_err(lock_poisoned)?;
        Ok(inner.get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> Result<(), StorageError> {
        check_key(key)?;
        let mut inner = self.inner.write().map_err(lock_poisoned)?;
        let version = self.next_version();
        inner.insert(key.to_string(), VersionedValue { value, version });
        Ok(())
    }

    fn range_scan<'a>(
        &'a self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn StateIterator + 'a>, StorageError> {
        let inner = self.inner.read().map_err(lock_poisoned)?;

        let lower = match start {
            "" => Bound::Unbounded,
            start => Bound::Included(start.to_string()),
        };
        let upper = match end {
            "" => Bound::Unbounded,
            end => Bound::Excluded(end.to_string()),
        };

        // BTreeMap::range panics on inverted bounds
        let entries: Vec<StateEntry> = if !start.is_empty() && !end.is_empty() && start >= end {
            Vec::new()
        } else {
            inner
                .range((lower, upper))
                .map(|(key, v)| StateEntry {
                    key: key.clone(),
                    value: v.value.clone(),
                    version: v.version,
                })
                .collect()
        };

        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryCursor {
            entries: entries.into_iter(),
            open_cursors: &self.open_cursors,
            closed: false,
        }))
    }

    fn commit(&self, rw_set: ReadWriteSet) -> Result<(), StorageError> {
        let mut inner = self.inner.write().map_err(lock_poisoned)?;

        // 1. Validate every read against the committed version
        for (key, read) in rw_set.reads() {
            let committed = inner.get(key).map_or(0, |v| v.version);
            if committed != *read {
                return Err(StorageError::ReadConflict {
                    key: key.clone(),
                    read: *read,
                    committed,
                });
            }
        }

        if rw_set.is_read_only() {
            return Ok(());
        }

        // 2. Apply writes under one version
        let writes = rw_set.into_writes();
        for key in writes.keys() {
            check_key(key)?;
        }
        let version = self.next_version();
        for (key, value) in writes {
            inner.insert(key, VersionedValue { value, version });
        }
        Ok(())
    }
}

/// Cursor over a snapshot of the scanned range.
struct MemoryCursor<'a> {
    entries: std::vec::IntoIter<StateEntry>,
    open_cursors: &'a AtomicUsize,
    closed: bool,
}

impl<'a> Iterator for MemoryCursor<'a> {
    type Item = Result<StateEntry, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return Some(Err(StorageError::CursorClosed));
        }
        self.entries.next().map(Ok)
    }
}

impl<'a> StateIterator for MemoryCursor<'a> {
    fn close(&mut self) -> Result<(), StorageError> {
        if self.closed {
            return Err(StorageError::CursorClosed);
        }
        self.closed = true;
        self.open_cursors.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
