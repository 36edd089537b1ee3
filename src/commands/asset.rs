/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Implements the key-value chaincode: an opaque value stored under a caller-chosen key.

use crate::{
    context::TransactionContext, error::ChaincodeError, storage::WorldStateStorage,
    types::KeyValueAsset,
};

/// Set
///
/// Stores `value` at `key`. Both must be present.
pub fn set<S>(
    ctx: &mut TransactionContext<'_, S>,
    key: &str,
    value: &str,
) -> Result<(), ChaincodeError>
where
    S: WorldStateStorage + ?Sized,
{
    if key.is_empty() || value.is_empty() {
        return Err(ChaincodeError::InvalidArgument(
            "expecting a key and a value".to_string(),
        ));
    }
    let asset = KeyValueAsset {
        key: key.to_string(),
        value: value.as_bytes().to_vec(),
    };
    ctx.put_state(&asset.key, asset.value)
}

/// Get
///
/// Returns the value at `key`. An absent key is an error, not an empty value.
pub fn get<S>(ctx: &TransactionContext<'_, S>, key: &str) -> Result<Vec<u8>, ChaincodeError>
where
    S: WorldStateStorage + ?Sized,
{
    if key.is_empty() {
        return Err(ChaincodeError::InvalidArgument("expecting a key".to_string()));
    }
    ctx.get_state(key)?
        .ok_or_else(|| ChaincodeError::NotFound(format!("asset {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_set_then_get() {
        let storage = MemoryStorage::new();
        let mut ctx = TransactionContext::new(&storage, "tx".to_string());

        set(&mut ctx, "a", "100").unwrap();
        assert_eq!(get(&ctx, "a").unwrap(), b"100".to_vec());
    }

    #[test]
    fn test_get_missing() {
        let storage = MemoryStorage::new();
        let ctx = TransactionContext::new(&storage, "tx".to_string());
        assert_eq!(
            get(&ctx, "b"),
            Err(ChaincodeError::NotFound("asset b".to_string()))
        );
    }

    #[test]
    fn test_missing_arguments() {
        let storage = MemoryStorage::new();
        let mut ctx = TransactionContext::new(&storage, "tx".to_string());

        assert!(matches!(set(&mut ctx, "", "v"), Err(ChaincodeError::InvalidArgument(_))));
        assert!(matches!(set(&mut ctx, "k", ""), Err(ChaincodeError::InvalidArgument(_))));
        assert!(matches!(get(&ctx, ""), Err(ChaincodeError::InvalidArgument(_))));
        assert!(ctx.into_read_write_set().is_read_only());
    }
}
