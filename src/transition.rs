/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! transition defines how an invocation moves world state forward.
//!
//! ```text
//! submit(WS, F, ARGS) -> (WS', R)
//! evaluate(WS, F, ARGS) -> R
//!
//! WS = World state, injected as an implementation of WorldStateStorage
//! F = Function resolved from the invoked name
//! R = Result, payload of the function or the error it ended with
//! ```
//!
//! A submitted invocation runs as one unit: every read and write of the function goes through a
//! single [TransactionContext], and its read-write set is committed in one call to world state.
//! If the function fails, or the commit is rejected, nothing is written.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use sha2::{Digest, Sha256};

use crate::{
    commands::Invocation, context::TransactionContext, error::ChaincodeError,
    storage::WorldStateStorage,
};

/// Runtime executes chaincode invocations against world state.
#[derive(Default)]
pub struct Runtime {
    /// Distinguishes transaction ids generated by this runtime
    nonce: AtomicU64,
}

impl Runtime {
    /// Instantiate Runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute the invocation and commit its writes to `ws` if it succeeds.
    pub fn submit<S>(&self, ws: &S, invocation: &Invocation) -> TransactionResult
    where
        S: WorldStateStorage + ?Sized,
    {
        let tx_id = self.next_tx_id(invocation);
        let mut ctx = TransactionContext::new(ws, tx_id.clone());

        let payload = match invocation.function.execute(&mut ctx, &invocation.args) {
            Ok(payload) => payload,
            Err(error) => {
                ctx.revert_changes();
                tracing::debug!(%tx_id, function = %invocation.function, %error, "transaction failed");
                return TransactionResult::failed(tx_id, error);
            }
        };

        let rw_set = ctx.into_read_write_set();
        let writes = rw_set.writes().len();
        match ws.commit(rw_set) {
            Ok(()) => {
                tracing::info!(%tx_id, function = %invocation.function, writes, "transaction committed");
                TransactionResult::success(tx_id, payload)
            }
            Err(error) => {
                let error = ChaincodeError::from(error);
                tracing::warn!(%tx_id, function = %invocation.function, %error, "transaction rejected");
                TransactionResult::failed(tx_id, error)
            }
        }
    }

    /// Execute the invocation without committing anything. Writes made by the function are discarded.
    pub fn evaluate<S>(&self, ws: &S, invocation: &Invocation) -> TransactionResult
    where
        S: WorldStateStorage + ?Sized,
    {
        let tx_id = self.next_tx_id(invocation);
        let mut ctx = TransactionContext::new(ws, tx_id.clone());

        match invocation.function.execute(&mut ctx, &invocation.args) {
            Ok(payload) => {
                if !ctx.into_read_write_set().is_read_only() {
                    tracing::debug!(%tx_id, function = %invocation.function, "discarding writes of evaluated transaction");
                }
                TransactionResult::success(tx_id, payload)
            }
            Err(error) => {
                tracing::debug!(%tx_id, function = %invocation.function, %error, "evaluation failed");
                TransactionResult::failed(tx_id, error)
            }
        }
    }

    /// Hex encoded SHA-256 over a per-runtime nonce, the current time and the invocation.
    fn next_tx_id(&self, invocation: &Invocation) -> String {
        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());

        let mut hasher = Sha256::new();
        hasher.update(nonce.to_le_bytes());
        hasher.update(timestamp.to_le_bytes());
        hasher.update(invocation.function.name().as_bytes());
        for arg in &invocation.args {
            hasher.update((arg.len() as u64).to_le_bytes());
            hasher.update(arg.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Result of an invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionResult {
    /// Identifier of the transaction
    pub tx_id: String,
    /// Bytes returned by the function. Empty if it failed or returned nothing.
    pub payload: Vec<u8>,
    /// Error the invocation ended with. None if it succeeded.
    pub error: Option<ChaincodeError>,
}

impl TransactionResult {
    fn success(tx_id: String, payload: Vec<u8>) -> Self {
        Self {
            tx_id,
            payload,
            error: None,
        }
    }

    /// Result of an invocation that never reached a function, e.g. an unknown name.
    pub fn failed(tx_id: String, error: ChaincodeError) -> Self {
        Self {
            tx_id,
            payload: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<Vec<u8>, ChaincodeError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.payload),
        }
    }
}
