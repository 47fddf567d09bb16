use serde::{Deserialize, Serialize};

/// A punch location as offered by the backend (display name + internal code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub code: String,
}

impl Location {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Location {
            name: name.into(),
            code: code.into(),
        }
    }
}
