/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! error defines the set of errors a chaincode invocation can end with.

use crate::storage::StorageError;

/// Descriptive error definitions of a chaincode invocation
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChaincodeError {
    /// Arguments are missing, malformed or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No value exists at the key.
    #[error("{0} does not exist")]
    NotFound(String),

    /// A record with the same id is already stored.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// World state failed to serve a read.
    #[error("failed to read from world state: {0}")]
    StoreRead(StorageError),

    /// World state failed to accept a write.
    #[error("failed to write to world state: {0}")]
    StoreWrite(StorageError),

    /// The transaction read a key that another commit changed before this one was applied.
    /// Nothing was written.
    #[error("transaction rejected at commit: {0}")]
    MvccConflict(StorageError),

    /// Bytes stored at the key cannot be decoded as the expected entity.
    #[error("corrupted state at {key}: {reason}")]
    CorruptedState { key: String, reason: String },
}

impl ChaincodeError {
    /// Name of the error kind, as reported to gateway clients.
    pub fn kind(&self) -> &'static str {
        match self {
            ChaincodeError::InvalidArgument(_) => "InvalidArgument",
            ChaincodeError::NotFound(_) => "NotFound",
            ChaincodeError::AlreadyExists(_) => "AlreadyExists",
            ChaincodeError::StoreRead(_) => "StoreReadError",
            ChaincodeError::StoreWrite(_) => "StoreWriteError",
            ChaincodeError::MvccConflict(_) => "MvccConflict",
            ChaincodeError::CorruptedState { .. } => "CorruptedState",
        }
    }
}

impl From<StorageError> for ChaincodeError {
    /// Errors surfacing at commit. Read conflicts become [ChaincodeError::MvccConflict],
    /// everything else is a failed write.
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::ReadConflict { .. } => ChaincodeError::MvccConflict(error),
            _ => ChaincodeError::StoreWrite(error),
        }
    }
}
