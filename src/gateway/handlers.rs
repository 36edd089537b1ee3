/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Request handlers. Each one reads its fields, invokes one chaincode function by name with the
//! fields as ordered arguments, and writes back the result.
//!
//! Missing fields are passed on as empty strings so that the chaincode reports them as invalid
//! arguments, the same way it reports malformed ones. Fields that cannot be read at all (a body
//! that is not a form, a field given twice under its two names) are rejected as invalid arguments
//! before any transaction is started.

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Form, Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::{
    response::{rejection_response, transaction_response, Payload},
    GatewayState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AddParams {
    #[serde(alias = "no")]
    id: String,
    name: String,
    age: String,
    #[serde(alias = "salary")]
    amount: String,
    #[serde(alias = "position")]
    category: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct IdParams {
    #[serde(alias = "no")]
    id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct IncreaseParams {
    #[serde(alias = "no")]
    id: String,
    #[serde(alias = "salary")]
    delta: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SetParams {
    key: String,
    value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct KeyParams {
    key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RangeParams {
    start: String,
    end: String,
}

pub(crate) async fn healthz(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "channel": state.channel,
        "chaincode": state.chaincode,
        "asset_chaincode": state.asset_chaincode,
    }))
}

pub(crate) async fn add(
    State(state): State<GatewayState>,
    params: Result<Form<AddParams>, FormRejection>,
) -> Response {
    let Form(params) = match params {
        Ok(params) => params,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    let args = vec![params.id, params.name, params.age, params.amount, params.category];
    let result = state.records.submit_transaction("Add", &args);
    transaction_response(result, Payload::Json)
}

pub(crate) async fn find_by_no_query(
    State(state): State<GatewayState>,
    params: Result<Query<IdParams>, QueryRejection>,
) -> Response {
    match params {
        Ok(Query(params)) => find_by_no(&state, params),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

pub(crate) async fn find_by_no_form(
    State(state): State<GatewayState>,
    params: Result<Form<IdParams>, FormRejection>,
) -> Response {
    match params {
        Ok(Form(params)) => find_by_no(&state, params),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

fn find_by_no(state: &GatewayState, params: IdParams) -> Response {
    let result = state.records.evaluate_transaction("FindByID", &[params.id]);
    transaction_response(result, Payload::Json)
}

pub(crate) async fn query_all(State(state): State<GatewayState>) -> Response {
    let result = state.records.evaluate_transaction("QueryAll", &[]);
    transaction_response(result, Payload::Json)
}

pub(crate) async fn query_range(
    State(state): State<GatewayState>,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    let result = state
        .records
        .evaluate_transaction("QueryRange", &[params.start, params.end]);
    transaction_response(result, Payload::Json)
}

pub(crate) async fn salary_increase(
    State(state): State<GatewayState>,
    params: Result<Form<IncreaseParams>, FormRejection>,
) -> Response {
    let Form(params) = match params {
        Ok(params) => params,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    let result = state
        .records
        .submit_transaction("IncreaseAmount", &[params.id, params.delta]);
    transaction_response(result, Payload::Json)
}

pub(crate) async fn set(
    State(state): State<GatewayState>,
    params: Result<Form<SetParams>, FormRejection>,
) -> Response {
    let Form(params) = match params {
        Ok(params) => params,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    let result = state
        .assets
        .submit_transaction("Set", &[params.key, params.value]);
    transaction_response(result, Payload::Bytes)
}

pub(crate) async fn get_query(
    State(state): State<GatewayState>,
    params: Result<Query<KeyParams>, QueryRejection>,
) -> Response {
    match params {
        Ok(Query(params)) => get(&state, params),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

pub(crate) async fn get_form(
    State(state): State<GatewayState>,
    params: Result<Form<KeyParams>, FormRejection>,
) -> Response {
    match params {
        Ok(Form(params)) => get(&state, params),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

fn get(state: &GatewayState, params: KeyParams) -> Response {
    let result = state.assets.evaluate_transaction("Get", &[params.key]);
    transaction_response(result, Payload::Bytes)
}
