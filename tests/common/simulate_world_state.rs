use std::sync::Arc;

use chaincode_runtime::{
    storage::{MemoryStorage, WorldStateStorage},
    Invocation, Record, Runtime,
};

use super::add_invocation;

/// World state plus a runtime, seeded through submitted transactions.
pub struct SimulateWorldState {
    pub world_state: Arc<MemoryStorage>,
    pub runtime: Runtime,
}

impl SimulateWorldState {
    pub fn new() -> Self {
        Self {
            world_state: Arc::new(MemoryStorage::new()),
            runtime: Runtime::new(),
        }
    }

    pub fn with_records(records: &[Record]) -> Self {
        let sws = Self::new();
        for record in records {
            sws.submit(&add_invocation(record)).unwrap();
        }
        sws
    }

    pub fn submit(&self, invocation: &Invocation) -> Result<Vec<u8>, chaincode_runtime::ChaincodeError> {
        self.runtime
            .submit(self.world_state.as_ref(), invocation)
            .into_result()
    }

    pub fn evaluate(&self, invocation: &Invocation) -> Result<Vec<u8>, chaincode_runtime::ChaincodeError> {
        self.runtime
            .evaluate(self.world_state.as_ref(), invocation)
            .into_result()
    }

    pub fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.world_state.get(key).unwrap().map(|v| v.value)
    }
}
