/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Describes the business logic of the chaincode functions that a transaction can invoke.
//!
//! There are two families of functions:
//! - [Asset](asset) functions that get and set a single opaque value under a key.
//! - [Record](record) functions that add, find, scan and update JSON records keyed by id.
//!
//! Invocations name their function with a string. The name is resolved once through
//! [FUNCTION_NAMES] into a [Function], and the [Function] selects its handler with a `match`.
//!
//! Each family is deployed as its own [Chaincode] over its own world state. Records and assets
//! never share a key space, so a record scan only ever meets records.

pub mod asset;

pub mod record;

use std::{fmt, str::FromStr};

use crate::{context::TransactionContext, error::ChaincodeError, storage::WorldStateStorage};

/// The chaincode functions that can be invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Function {
    Init,
    Set,
    Get,
    Add,
    FindById,
    QueryAll,
    QueryRange,
    IncreaseAmount,
}

/// A deployable chaincode: the family of functions it serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Chaincode {
    /// Key-value chaincode: `Init`, `Set`, `Get`
    Asset,
    /// Record chaincode: `Add`, `FindByID`, `QueryAll`, `QueryRange`, `IncreaseAmount`
    Record,
}

impl fmt::Display for Chaincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chaincode::Asset => f.write_str("asset"),
            Chaincode::Record => f.write_str("record"),
        }
    }
}

/// Name to function table. The first entry of each function is its canonical name,
/// the rest are names used by earlier versions of the chaincode.
pub const FUNCTION_NAMES: &[(&str, Function)] = &[
    ("Init", Function::Init),
    ("Set", Function::Set),
    ("Get", Function::Get),
    ("Add", Function::Add),
    ("FindByID", Function::FindById),
    ("QueryAll", Function::QueryAll),
    ("QueryRange", Function::QueryRange),
    ("IncreaseAmount", Function::IncreaseAmount),
    ("init", Function::Init),
    ("set", Function::Set),
    ("get", Function::Get),
    ("FindByNo", Function::FindById),
    ("SalaryIncrease", Function::IncreaseAmount),
];

impl Function {
    /// Canonical name of the function.
    pub fn name(&self) -> &'static str {
        FUNCTION_NAMES
            .iter()
            .find(|(_, function)| function == self)
            .map_or("", |(name, _)| name)
    }

    /// Number of string arguments the function takes.
    pub fn arity(&self) -> usize {
        match self {
            Function::Init | Function::Set => 2,
            Function::Get | Function::FindById => 1,
            Function::Add => 5,
            Function::QueryAll => 0,
            Function::QueryRange | Function::IncreaseAmount => 2,
        }
    }

    /// The chaincode that serves the function.
    pub fn chaincode(&self) -> Chaincode {
        match self {
            Function::Init | Function::Set | Function::Get => Chaincode::Asset,
            _ => Chaincode::Record,
        }
    }

    /// Read-only functions are evaluated, all others are submitted for commit.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Function::Get | Function::FindById | Function::QueryAll | Function::QueryRange
        )
    }

    /// Run the function inside `ctx`. Returns the payload of the transaction.
    pub fn execute<S>(
        &self,
        ctx: &mut TransactionContext<'_, S>,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError>
    where
        S: WorldStateStorage + ?Sized,
    {
        if args.len() != self.arity() {
            return Err(ChaincodeError::InvalidArgument(format!(
                "incorrect number of arguments to {}: expecting {}, got {}",
                self.name(),
                self.arity(),
                args.len()
            )));
        }

        match self {
            Function::Init | Function::Set => {
                asset::set(ctx, &args[0], &args[1]).map(|()| Vec::new())
            }
            Function::Get => asset::get(ctx, &args[0]),
            Function::Add => record::add(ctx, &args[0], &args[1], &args[2], &args[3], &args[4])
                .map(|()| Vec::new()),
            Function::FindById => record::find_by_id(ctx, &args[0]).map(|r| r.to_bytes()),
            Function::QueryAll => record::query_all(ctx).map(|results| to_json(&results)),
            Function::QueryRange => {
                record::query_range(ctx, &args[0], &args[1]).map(|results| to_json(&results))
            }
            Function::IncreaseAmount => {
                record::increase_amount(ctx, &args[0], &args[1]).map(|()| Vec::new())
            }
        }
    }
}

fn to_json(results: &[crate::types::QueryResult]) -> Vec<u8> {
    serde_json::to_vec(results).unwrap_or_default()
}

impl FromStr for Function {
    type Err = ChaincodeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        FUNCTION_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, function)| *function)
            .ok_or_else(|| ChaincodeError::InvalidArgument(format!("unknown function: {name}")))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named function call with its ordered string arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub function: Function,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(function: Function, args: Vec<String>) -> Self {
        Self { function, args }
    }

    /// Resolve `name` into a [Function].
    pub fn parse(name: &str, args: &[String]) -> Result<Self, ChaincodeError> {
        Ok(Self {
            function: name.parse()?,
            args: args.to_vec(),
        })
    }
}
