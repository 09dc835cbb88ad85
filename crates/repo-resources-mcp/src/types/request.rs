//! Request parameter types.

use serde::{Deserialize, Serialize};

/// `initialize` params in configurable mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoInitializeParams {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceFetchParams {
    pub uri: String,
}
