/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The handle through which the gateway reaches a deployed chaincode.

use std::sync::Arc;

use crate::{
    commands::{Chaincode, Invocation},
    error::ChaincodeError,
    storage::WorldStateStorage,
    transition::{Runtime, TransactionResult},
};

/// A deployed chaincode, addressed by function name and ordered string arguments.
pub trait ContractHandle: Send + Sync {
    /// Invoke a function and commit its writes.
    fn submit_transaction(&self, name: &str, args: &[String]) -> TransactionResult;

    /// Invoke a function without committing.
    fn evaluate_transaction(&self, name: &str, args: &[String]) -> TransactionResult;
}

/// One chaincode running in this process against its own world state. Functions of other
/// chaincodes are rejected before they reach the runtime.
pub struct LocalContract<S>
where
    S: WorldStateStorage,
{
    chaincode: Chaincode,
    runtime: Runtime,
    ws: Arc<S>,
}

impl<S> LocalContract<S>
where
    S: WorldStateStorage,
{
    pub fn new(chaincode: Chaincode, ws: Arc<S>) -> Self {
        Self {
            chaincode,
            runtime: Runtime::new(),
            ws,
        }
    }

    pub fn chaincode(&self) -> Chaincode {
        self.chaincode
    }

    pub fn world_state(&self) -> &Arc<S> {
        &self.ws
    }

    fn resolve(&self, name: &str, args: &[String]) -> Result<Invocation, ChaincodeError> {
        let invocation = Invocation::parse(name, args)?;
        if invocation.function.chaincode() != self.chaincode {
            return Err(ChaincodeError::InvalidArgument(format!(
                "function {name} is not served by the {} chaincode",
                self.chaincode
            )));
        }
        Ok(invocation)
    }
}

impl<S> ContractHandle for LocalContract<S>
where
    S: WorldStateStorage,
{
    fn submit_transaction(&self, name: &str, args: &[String]) -> TransactionResult {
        match self.resolve(name, args) {
            Ok(invocation) => self.runtime.submit(self.ws.as_ref(), &invocation),
            Err(error) => TransactionResult::failed(String::new(), error),
        }
    }

    fn evaluate_transaction(&self, name: &str, args: &[String]) -> TransactionResult {
        match self.resolve(name, args) {
            Ok(invocation) => self.runtime.evaluate(self.ws.as_ref(), &invocation),
            Err(error) => TransactionResult::failed(String::new(), error),
        }
    }
}
