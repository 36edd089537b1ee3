/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Gateway configuration, read from command line arguments with environment variable fallbacks.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::filter::EnvFilter;

#[derive(Clone, Debug, Parser)]
#[command(about = "HTTP gateway submitting transactions to the record chaincode")]
pub struct GatewayConfig {
    /// Host to run the http server on
    #[arg(long, env = "GATEWAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to run the http server on
    #[arg(long, env = "GATEWAY_PORT", default_value = "10810")]
    pub port: u16,

    /// Channel the chaincode is deployed on
    #[arg(long, env = "GATEWAY_CHANNEL", default_value = "mychannel1")]
    pub channel: String,

    /// Name of the deployed record chaincode
    #[arg(long, env = "GATEWAY_CHAINCODE", default_value = "example2")]
    pub chaincode: String,

    /// Name of the deployed key-value chaincode
    #[arg(long, env = "GATEWAY_ASSET_CHAINCODE", default_value = "example1")]
    pub asset_chaincode: String,

    /// Key seeded through Init of the key-value chaincode at start-up
    #[arg(long, env = "GATEWAY_INIT_KEY", requires = "init_value")]
    pub init_key: Option<String>,

    /// Value seeded through Init at start-up
    #[arg(long, env = "GATEWAY_INIT_VALUE", requires = "init_key")]
    pub init_value: Option<String>,

    /// Log level
    #[arg(long, env = "GATEWAY_LOG_LEVEL", default_value = "info")]
    pub log_level: Level,

    /// Log format, text or json
    #[arg(long, env = "GATEWAY_LOG_FORMAT", default_value = "text")]
    pub log_format: String,
}

impl GatewayConfig {
    /// Install the global tracing subscriber.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::new(self.log_level.to_string());
        if self.log_format == "json" {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_ansi(false)
                .init();
        } else {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    /// The `Init` arguments, if both the key and the value are configured.
    pub fn init_args(&self) -> Option<Vec<String>> {
        match (&self.init_key, &self.init_value) {
            (Some(key), Some(value)) => Some(vec![key.clone(), value.clone()]),
            _ => None,
        }
    }
}
