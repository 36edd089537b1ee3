/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Implements the record chaincode. Each [Record] is stored as JSON under its id.
//!
//! Records are created by [add], read by [find_by_id], enumerated by [query_all] or
//! [query_range] and mutated only by [increase_amount]. There is no delete.

use crate::{
    context::{ScanCursor, TransactionContext},
    error::ChaincodeError,
    storage::WorldStateStorage,
    types::{parse_unsigned, QueryResult, Record},
};

/// Add
///
/// Stores a new record. Fails if a record with the same id exists or if `age` or `amount`
/// is not an unsigned integer.
pub fn add<S>(
    ctx: &mut TransactionContext<'_, S>,
    id: &str,
    name: &str,
    age: &str,
    amount: &str,
    category: &str,
) -> Result<(), ChaincodeError>
where
    S: WorldStateStorage + ?Sized,
{
    match find_by_id(ctx, id) {
        Ok(_) => return Err(ChaincodeError::AlreadyExists(format!("record {id}"))),
        Err(ChaincodeError::NotFound(_)) => {}
        Err(error) => return Err(error),
    }

    let record = Record {
        id: id.to_string(),
        name: name.to_string(),
        age: parse_unsigned("age", age)?,
        amount: parse_unsigned("amount", amount)?,
        category: category.to_string(),
    };
    ctx.put_state(id, record.to_bytes())
}

/// FindByID
pub fn find_by_id<S>(ctx: &TransactionContext<'_, S>, id: &str) -> Result<Record, ChaincodeError>
where
    S: WorldStateStorage + ?Sized,
{
    if id.is_empty() {
        return Err(ChaincodeError::InvalidArgument("id is required".to_string()));
    }
    match ctx.get_state(id)? {
        Some(bytes) => Record::from_bytes(id, &bytes),
        None => Err(ChaincodeError::NotFound(format!("record {id}"))),
    }
}

/// QueryAll
///
/// All records in world state, in key order.
pub fn query_all<S>(ctx: &TransactionContext<'_, S>) -> Result<Vec<QueryResult>, ChaincodeError>
where
    S: WorldStateStorage + ?Sized,
{
    query_range(ctx, "", "")
}

/// QueryRange
///
/// Records with `start <= id < end`, in key order. An empty bound is open.
pub fn query_range<S>(
    ctx: &TransactionContext<'_, S>,
    start: &str,
    end: &str,
) -> Result<Vec<QueryResult>, ChaincodeError>
where
    S: WorldStateStorage + ?Sized,
{
    scan(ctx, start, end)?.collect()
}

/// Lazy scan over the records in `[start, end)`. The underlying cursor is released when the
/// scan is exhausted, fails, or is dropped.
pub fn scan<'c, S>(
    ctx: &'c TransactionContext<'_, S>,
    start: &str,
    end: &str,
) -> Result<RecordScan<'c>, ChaincodeError>
where
    S: WorldStateStorage + ?Sized,
{
    Ok(RecordScan {
        cursor: ctx.get_state_by_range(start, end)?,
    })
}

pub struct RecordScan<'c> {
    cursor: ScanCursor<'c>,
}

impl<'c> Iterator for RecordScan<'c> {
    type Item = Result<QueryResult, ChaincodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.cursor.next()? {
            Ok(entry) => entry,
            Err(error) => return Some(Err(error)),
        };
        let result = Record::from_bytes(&entry.key, &entry.value).map(|record| QueryResult {
            key: entry.key,
            record,
        });
        if result.is_err() {
            // a failed scan is not resumed
            if let Err(error) = self.cursor.close() {
                tracing::warn!(%error, "failed to close record scan");
            }
        }
        Some(result)
    }
}

/// IncreaseAmount
///
/// Adds `delta` to the amount of the record with `id`.
pub fn increase_amount<S>(
    ctx: &mut TransactionContext<'_, S>,
    id: &str,
    delta: &str,
) -> Result<(), ChaincodeError>
where
    S: WorldStateStorage + ?Sized,
{
    let delta: u64 = parse_unsigned("delta", delta)?;
    let mut record = find_by_id(ctx, id)?;

    record.amount = record.amount.checked_add(delta).ok_or_else(|| {
        ChaincodeError::InvalidArgument(format!(
            "amount of record {id} overflows when increased by {delta}"
        ))
    })?;
    ctx.put_state(id, record.to_bytes())
}
