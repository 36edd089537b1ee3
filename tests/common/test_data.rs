use chaincode_runtime::Record;

pub struct TestData {}

impl TestData {
    pub fn record(id: &str, name: &str, age: u32, amount: u64, category: &str) -> Record {
        Record {
            id: id.to_string(),
            name: name.to_string(),
            age,
            amount,
            category: category.to_string(),
        }
    }

    pub fn zhang() -> Record {
        Self::record("1", "Zhang", 18, 10000, "Boss")
    }

    pub fn staff() -> Vec<Record> {
        vec![
            Self::record("2", "Li", 25, 6000, "Engineer"),
            Self::zhang(),
            Self::record("3", "Wang", 31, 8000, "Manager"),
        ]
    }
}
