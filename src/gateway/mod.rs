/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! HTTP gateway in front of a deployed chaincode.
//!
//! | Route             | Method    | Fields                                     | Function         |
//! |-------------------|-----------|--------------------------------------------|------------------|
//! | `/add`            | POST      | `id`, `name`, `age`, `amount`, `category`  | `Add` (submit)   |
//! | `/findByNo`       | GET, POST | `id`                                       | `FindByID`       |
//! | `/queryAll`       | GET       |                                            | `QueryAll`       |
//! | `/queryRange`     | GET       | `start`, `end`                             | `QueryRange`     |
//! | `/salaryIncrease` | POST      | `id`, `delta`                              | `IncreaseAmount` (submit) |
//! | `/set`            | POST      | `key`, `value`                             | `Set` (submit)   |
//! | `/get`            | GET, POST | `key`                                      | `Get`            |
//!
//! `/set` and `/get` reach the asset chaincode, every other route reaches the record chaincode.
//! The two are deployed separately and do not share world state.
//!
//! `no`, `salary` and `position` are accepted in place of `id`, `amount`/`delta` and `category`.
//! Successful calls answer `200` with the raw payload, failures answer with the status of their
//! error kind (see [status_code]). Functions that return nothing answer `204`. Requests whose
//! fields cannot be read are answered like any other invalid argument. All responses carry the
//! transaction id in the `x-transaction-id` header, empty if no transaction was started.

pub mod config;
pub use config::GatewayConfig;

pub mod contract;
pub use contract::{ContractHandle, LocalContract};

mod handlers;

pub mod response;
pub use response::{status_code, TRANSACTION_ID_HEADER};

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};

/// Shared by all requests. Read-only after start-up.
#[derive(Clone)]
pub struct GatewayState {
    /// Key-value chaincode
    pub assets: Arc<dyn ContractHandle>,
    /// Record chaincode
    pub records: Arc<dyn ContractHandle>,
    pub channel: String,
    pub asset_chaincode: String,
    pub chaincode: String,
}

impl GatewayState {
    pub fn new(
        assets: Arc<dyn ContractHandle>,
        records: Arc<dyn ContractHandle>,
        config: &GatewayConfig,
    ) -> Self {
        Self {
            assets,
            records,
            channel: config.channel.clone(),
            asset_chaincode: config.asset_chaincode.clone(),
            chaincode: config.chaincode.clone(),
        }
    }
}

pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/add", post(handlers::add))
        .route(
            "/findByNo",
            get(handlers::find_by_no_query).post(handlers::find_by_no_form),
        )
        .route("/queryAll", get(handlers::query_all))
        .route("/queryRange", get(handlers::query_range))
        .route("/salaryIncrease", post(handlers::salary_increase))
        .route("/set", post(handlers::set))
        .route("/get", get(handlers::get_query).post(handlers::get_form))
        .with_state(state)
}

/// Serve the gateway until Ctrl-C.
pub async fn serve(config: &GatewayConfig, state: GatewayState) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        channel = %state.channel,
        asset_chaincode = %state.asset_chaincode,
        chaincode = %state.chaincode,
        "gateway listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("gateway shutting down");
}
