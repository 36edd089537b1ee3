/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines common data structures to be used inside this library, or from outside application.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChaincodeError;

/// A single value stored under a key by the key-value chaincode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueAsset {
    pub key: String,
    pub value: Vec<u8>,
}

/// A record stored by the record chaincode under its `id`.
///
/// Field names on the wire are fixed. The names used by the employee chaincode
/// (`no`, `salary`, `position`) are accepted when decoding. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(alias = "no")]
    pub id: String,
    pub name: String,
    pub age: u32,
    #[serde(alias = "salary")]
    pub amount: u64,
    #[serde(alias = "position")]
    pub category: String,
}

impl Record {
    pub fn to_bytes(&self) -> Vec<u8> {
        // serializing a struct of strings and integers cannot fail
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Decode the bytes stored at `key`.
    pub fn from_bytes(key: &str, bytes: &[u8]) -> Result<Self, ChaincodeError> {
        serde_json::from_slice(bytes).map_err(|e| ChaincodeError::CorruptedState {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// An item of a range scan over records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: Record,
}

/// Parse an unsigned integer argument. Input that is empty, negative, not a number or out of range
/// for `T` is rejected.
pub fn parse_unsigned<T>(field: &str, input: &str) -> Result<T, ChaincodeError>
where
    T: FromStr,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ChaincodeError::InvalidArgument(format!("{field} is required")));
    }
    if trimmed.starts_with('-') {
        return Err(ChaincodeError::InvalidArgument(format!(
            "{field} must not be negative: {input}"
        )));
    }
    trimmed.parse::<T>().map_err(|_| {
        ChaincodeError::InvalidArgument(format!("{field} is not an unsigned integer: {input}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_wire_format() {
        let record = Record {
            id: "1".to_string(),
            name: "Zhang".to_string(),
            age: 18,
            amount: 10000,
            category: "Boss".to_string(),
        };
        assert_eq!(
            String::from_utf8(record.to_bytes()).unwrap(),
            r#"{"id":"1","name":"Zhang","age":18,"amount":10000,"category":"Boss"}"#
        );

        let legacy = br#"{"no":"1","name":"Zhang","age":18,"salary":10000,"position":"Boss","dept":"x"}"#;
        assert_eq!(Record::from_bytes("1", legacy).unwrap(), record);

        let result = QueryResult {
            key: "1".to_string(),
            record,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["Key"], "1");
        assert_eq!(json["Record"]["amount"], 10000);
    }

    #[test]
    fn test_corrupted_record() {
        assert!(matches!(
            Record::from_bytes("7", b"not json"),
            Err(ChaincodeError::CorruptedState { key, .. }) if key == "7"
        ));
    }

    #[test]
    fn test_parse_unsigned() {
        assert_eq!(parse_unsigned::<u64>("amount", "10000"), Ok(10000));
        assert_eq!(parse_unsigned::<u32>("age", " 18 "), Ok(18));

        for bad in ["", "  ", "-1", "abc", "1.5", "0x10"] {
            assert!(matches!(
                parse_unsigned::<u64>("amount", bad),
                Err(ChaincodeError::InvalidArgument(_))
            ));
        }
        // out of range for the target type
        assert!(parse_unsigned::<u32>("age", "4294967296").is_err());
    }
}
