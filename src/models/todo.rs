use serde::{Deserialize, Serialize};

/// One decoded row of an uploaded todo file. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoCsv {
    #[serde(default)]
    pub todo_name: String,
    #[serde(default)]
    pub note: String,
}
