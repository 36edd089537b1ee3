use std::sync::Arc;

use chaincode_runtime::{
    gateway::{self, GatewayConfig, GatewayState, LocalContract},
    storage::MemoryStorage,
    Chaincode,
};
use clap::Parser;
use tokio::net::TcpListener;

/// Serve a gateway over fresh world states on an ephemeral port. Returns its base url.
pub async fn spawn_gateway() -> String {
    let config = GatewayConfig::parse_from(["gateway"]);
    let assets = Arc::new(LocalContract::new(
        Chaincode::Asset,
        Arc::new(MemoryStorage::new()),
    ));
    let records = Arc::new(LocalContract::new(
        Chaincode::Record,
        Arc::new(MemoryStorage::new()),
    ));
    let state = GatewayState::new(assets, records, &config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, gateway::router(state)).await.unwrap();
    });
    format!("http://{address}")
}
