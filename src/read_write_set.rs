/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines the read-write set of a transaction: the version of every key the transaction read
//! and the value of every key it wrote.
//!
//! The set is what a transaction hands to world state at commit. World state validates the
//! recorded `reads` against its committed versions, and only if all of them still hold it applies
//! the `writes`. This is how two transactions that read-modify-write the same key concurrently are
//! serialized: the later one fails validation and none of its writes are applied.

use std::collections::BTreeMap;

use crate::storage::{Key, Value, Version};

/// ReadWriteSet defines the outcome of executing a transaction against world state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadWriteSet {
    /// reads stores the version of each key as first observed by the transaction. `0` marks a key that was absent.
    reads: BTreeMap<Key, Version>,
    /// writes stores key-value pairs pending to be stored into world state
    writes: BTreeMap<Key, Value>,
}

impl ReadWriteSet {
    /// Record the version observed for `key`. Only the first observation counts, later reads
    /// of the same key within the transaction do not overwrite it.
    pub fn record_read(&mut self, key: &str, version: Version) {
        self.reads.entry(key.to_string()).or_insert(version);
    }

    pub fn record_write(&mut self, key: &str, value: Value) {
        self.writes.insert(key.to_string(), value);
    }

    /// Latest value written by the transaction at `key`.
    pub fn written(&self, key: &str) -> Option<&Value> {
        self.writes.get(key)
    }

    pub fn reads(&self) -> &BTreeMap<Key, Version> {
        &self.reads
    }

    pub fn writes(&self) -> &BTreeMap<Key, Value> {
        &self.writes
    }

    pub fn into_writes(self) -> BTreeMap<Key, Value> {
        self.writes
    }

    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }

    /// Discard everything recorded so far.
    pub fn clear(&mut self) {
        self.reads.clear();
        self.writes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_read_version_wins() {
        let mut rw_set = ReadWriteSet::default();
        rw_set.record_read("k", 3);
        rw_set.record_read("k", 7);
        assert_eq!(rw_set.reads().get("k"), Some(&3));
    }

    #[test]
    fn test_last_write_wins() {
        let mut rw_set = ReadWriteSet::default();
        assert!(rw_set.is_read_only());

        rw_set.record_write("k", b"a".to_vec());
        rw_set.record_write("k", b"b".to_vec());
        assert_eq!(rw_set.written("k"), Some(&b"b".to_vec()));
        assert!(!rw_set.is_read_only());

        rw_set.clear();
        assert!(rw_set.is_read_only());
        assert!(rw_set.reads().is_empty());
    }
}
