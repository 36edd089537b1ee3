/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines the capability a host ledger exposes to chaincode: versioned point reads, writes,
//! ordered range scans and the commit of a transaction's [ReadWriteSet].
//!
//! The world state itself is owned by the host. Chaincode never holds on to it; a reference
//! to an implementation of [WorldStateStorage] is injected into every transaction through
//! [TransactionContext](crate::context::TransactionContext).
//!
//! [memory] provides an in-process implementation that behaves like the host store
//! (lexicographic key order, per-key versions, read-version validation on commit).

pub mod memory;
pub use memory::MemoryStorage;

use crate::read_write_set::ReadWriteSet;

/// Key of an entry in world state.
pub type Key = String;

/// Raw bytes stored under a [Key].
pub type Value = Vec<u8>;

/// Version of a key, as observed when it was read. `0` denotes a key that has never been written.
pub type Version = u64;

/// Value stored in world state together with the version of the commit that wrote it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionedValue {
    pub value: Value,
    pub version: Version,
}

/// An entry yielded by a range scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateEntry {
    pub key: Key,
    pub value: Value,
    pub version: Version,
}

/// Failures reported by the host store. These are never retried by chaincode.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The store could not serve the request.
    #[error("world state unavailable: {0}")]
    Unavailable(String),

    /// The key violates the store's key rules.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// A key read by the transaction was changed by another commit in the meantime.
    #[error("read conflict on key {key:?}: read version {read}, committed version {committed}")]
    ReadConflict {
        key: Key,
        read: Version,
        committed: Version,
    },

    /// The cursor was used after it had been closed.
    #[error("range cursor already closed")]
    CursorClosed,
}

/// Cursor over the entries of a range scan. Implementations hold store resources
/// until [close](StateIterator::close) is called.
pub trait StateIterator: Iterator<Item = Result<StateEntry, StorageError>> {
    fn close(&mut self) -> Result<(), StorageError>;
}

/// The narrow interface of the host store.
pub trait WorldStateStorage: Send + Sync {
    /// Latest committed value at `key`, None if absent.
    fn get(&self, key: &str) -> Result<Option<VersionedValue>, StorageError>;

    /// Write `value` at `key` outside of any transaction. Used for seeding state.
    fn put(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Cursor over committed entries with `start <= key < end`, in key order.
    /// An empty `start` or `end` leaves that side of the range unbounded.
    fn range_scan<'a>(
        &'a self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn StateIterator + 'a>, StorageError>;

    /// Validate the read versions of `rw_set` against committed state and, if all of them
    /// still hold, apply its writes. Nothing is applied on conflict.
    ///
    /// The default implementation is not atomic with respect to other committers. Stores that
    /// are shared between threads should override it.
    fn commit(&self, rw_set: ReadWriteSet) -> Result<(), StorageError> {
        for (key, read) in rw_set.reads() {
            let committed = self.get(key)?.map_or(0, |v| v.version);
            if committed != *read {
                return Err(StorageError::ReadConflict {
                    key: key.clone(),
                    read: *read,
                    committed,
                });
            }
        }
        for (key, value) in rw_set.into_writes() {
            self.put(&key, value)?;
        }
        Ok(())
    }
}

impl<S: WorldStateStorage + ?Sized> WorldStateStorage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<VersionedValue>, StorageError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Value) -> Result<(), StorageError> {
        (**self).put(key, value)
    }

    fn range_scan<'a>(
        &'a self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn StateIterator + 'a>, StorageError> {
        (**self).range_scan(start, end)
    }

    fn commit(&self, rw_set: ReadWriteSet) -> Result<(), StorageError> {
        (**self).commit(rw_set)
    }
}
