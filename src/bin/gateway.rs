/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

use std::sync::Arc;

use clap::Parser;

use chaincode_runtime::{
    gateway::{self, ContractHandle, GatewayConfig, GatewayState, LocalContract},
    storage::MemoryStorage,
    Chaincode,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = GatewayConfig::parse();
    config.init_tracing();

    let assets = Arc::new(LocalContract::new(
        Chaincode::Asset,
        Arc::new(MemoryStorage::new()),
    ));
    let records = Arc::new(LocalContract::new(
        Chaincode::Record,
        Arc::new(MemoryStorage::new()),
    ));

    if let Some(args) = config.init_args() {
        let result = assets.submit_transaction("Init", &args);
        if let Some(error) = result.error {
            anyhow::bail!(
                "failed to initialize chaincode {}: {error}",
                config.asset_chaincode
            );
        }
        tracing::info!(tx_id = %result.tx_id, key = %args[0], "chaincode initialized");
    }

    let state = GatewayState::new(assets, records, &config);
    gateway::serve(&config, state).await
}
