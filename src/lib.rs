/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Chaincode Runtime executes key-value and record chaincode against a world state that is owned
//! by the host ledger, and exposes the chaincode to clients through an HTTP gateway.
//!
//! ```text
//! f(WS, F, ARGS) -> (WS', R)
//!
//! WS = World state represented by set of versioned key-value pairs
//! F = Chaincode function, e.g. Add, FindByID, QueryAll, IncreaseAmount, Set, Get
//! ARGS = Ordered string arguments of the function
//! R = Result, which is the payload of the function or a typed error.
//! ```
//!
//! ### Example
//!
//! ```rust
//! let ws = chaincode_runtime::storage::MemoryStorage::new();
//! let invocation = Invocation::parse("Add", &args)?;
//! let result = chaincode_runtime::Runtime::new().submit(&ws, &invocation);
//! ```
//!
//! In summary, a [transition] resolves an invocation into one of the chaincode [commands] and runs
//! it inside a transaction [context] over [storage]. Its [read_write_set] is committed to world
//! state only if the function succeeds and no key it read has changed since. Failures are reported
//! as an [error]. The [gateway] maps HTTP requests onto invocations.

pub mod commands;
pub use commands::{Chaincode, Function, Invocation};

pub mod context;

pub mod error;
pub use error::ChaincodeError;

pub mod gateway;

pub mod read_write_set;

pub mod storage;

pub mod transition;
pub use transition::{Runtime, TransactionResult};

pub mod types;
pub use types::{KeyValueAsset, QueryResult, Record};
