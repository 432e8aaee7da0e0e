//! Checkbox option shape used by the interests control.

use serde::{Deserialize, Serialize};

/// One box of the interests checkbox group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxOption {
    pub id: String,
    pub label: String,
    pub checked: bool,
}

impl CheckboxOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, checked: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            checked,
        }
    }
}
