use serde::{Deserialize, Serialize};

/// Raw dataset entry as stored in `data/flags.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlagRecord {
    pub name: String,
    pub code: String,
}

/// Flag as served over HTTP and consumed by the quiz client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub code: String,
    /// Display URL derived from `code`
    pub image: String,
}

impl Flag {
    pub fn new(record: FlagRecord, image: String) -> Self {
        Self {
            name: record.name,
            code: record.code,
            image,
        }
    }
}
