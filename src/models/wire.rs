//! Wire records exchanged with the answers API.

use serde::{Deserialize, Serialize};

/// One interest as the API sends and accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInterest {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub is_checked: bool,
}

/// The answer record returned by the API and used as the update request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnswers {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mail: String,
    /// `null` until the user submits an age
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub interests: Vec<ApiInterest>,
}
