use chaincode_runtime::{ChaincodeError, Function, Invocation, QueryResult, Record};

/// Decodes the payload returned by a chaincode function.
pub struct CallResult;

impl CallResult {
    pub fn record(payload: Result<Vec<u8>, ChaincodeError>) -> Record {
        serde_json::from_slice(&payload.unwrap()).unwrap()
    }

    pub fn records(payload: Result<Vec<u8>, ChaincodeError>) -> Vec<QueryResult> {
        serde_json::from_slice(&payload.unwrap()).unwrap()
    }
}

pub struct ArgsBuilder {
    pub args: Vec<String>,
}

impl ArgsBuilder {
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    pub fn add<T: ToString>(mut self, arg: T) -> Self {
        self.args.push(arg.to_string());
        self
    }

    pub fn invoke(self, function: Function) -> Invocation {
        Invocation::new(function, self.args)
    }
}

pub fn add_invocation(record: &Record) -> Invocation {
    ArgsBuilder::new()
        .add(&record.id)
        .add(&record.name)
        .add(record.age)
        .add(record.amount)
        .add(&record.category)
        .invoke(Function::Add)
}
