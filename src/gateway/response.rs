/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Turns transaction results into HTTP responses. Every error kind gets its own status code.

use axum::{
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{error::ChaincodeError, transition::TransactionResult};

pub const TRANSACTION_ID_HEADER: &str = "x-transaction-id";

/// Media type of a successful payload.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Payload {
    Json,
    Bytes,
}

impl Payload {
    fn content_type(self) -> &'static str {
        match self {
            Payload::Json => "application/json",
            Payload::Bytes => "application/octet-stream",
        }
    }
}

pub fn status_code(error: &ChaincodeError) -> StatusCode {
    match error {
        ChaincodeError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        ChaincodeError::NotFound(_) => StatusCode::NOT_FOUND,
        ChaincodeError::AlreadyExists(_) | ChaincodeError::MvccConflict(_) => StatusCode::CONFLICT,
        ChaincodeError::StoreRead(_)
        | ChaincodeError::StoreWrite(_)
        | ChaincodeError::CorruptedState { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn transaction_response(result: TransactionResult, payload: Payload) -> Response {
    let tx_id_header = HeaderName::from_static(TRANSACTION_ID_HEADER);
    match result.error {
        None if result.payload.is_empty() => {
            (StatusCode::NO_CONTENT, [(tx_id_header, result.tx_id)]).into_response()
        }
        None => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, payload.content_type().to_string()),
                (tx_id_header, result.tx_id),
            ],
            result.payload,
        )
            .into_response(),
        Some(error) => {
            let code = status_code(&error);
            tracing::warn!(tx_id = %result.tx_id, %error, status = code.as_u16(), "transaction failed");
            let body = json!({
                "error": {
                    "code": code.as_u16(),
                    "kind": error.kind(),
                    "message": error.to_string(),
                }
            });
            (
                code,
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (tx_id_header, result.tx_id),
                ],
                body.to_string(),
            )
                .into_response()
        }
    }
}

/// Response to a request whose fields could not be extracted. No transaction was started.
pub(crate) fn rejection_response(message: String) -> Response {
    let error = ChaincodeError::InvalidArgument(message);
    transaction_response(TransactionResult::failed(String::new(), error), Payload::Json)
}
