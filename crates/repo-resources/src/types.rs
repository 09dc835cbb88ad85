//! Core data types for repository configuration, tree listings, and resources.

use serde::{Deserialize, Serialize};

/// Branch used when none is given.
pub const DEFAULT_BRANCH: &str = "main";

/// MIME label attached to every fetched file, whatever its real content type.
pub const TEXT_PLAIN: &str = "text/plain";

/// The repository a server instance mirrors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepoConfig {
    /// Build a configuration, rejecting empty owner or repo names.
    ///
    /// A missing or empty branch falls back to [`DEFAULT_BRANCH`].
    pub fn new(owner: &str, repo: &str, branch: Option<&str>) -> RepoResult<Self> {
        if owner.trim().is_empty() {
            return Err(RepoError::InvalidConfig("owner must not be empty".to_string()));
        }
        if repo.trim().is_empty() {
            return Err(RepoError::InvalidConfig("repo must not be empty".to_string()));
        }

        let branch = branch
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(DEFAULT_BRANCH);

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
        })
    }

    /// `owner/repo@branch`, for logs and messages.
    pub fn slug(&self) -> String {
        format!("{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

/// Kind of a git tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    Commit,
    #[serde(other)]
    Other,
}

/// One entry of a recursive git tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn blob(path: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: EntryKind::Blob,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }
}

/// Body of GitHub's `git/trees/{branch}?recursive=1` response.
///
/// A body without a `tree` array decodes as an empty listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeListing {
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

/// A file exposed as a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResource {
    pub uri: String,
    pub name: String,
}

/// Contents of a fetched resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub content: String,
}

/// Errors that can occur while talking to a repository host.
#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid resource URI: {0}")]
    InvalidUri(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GET {url} returned HTTP {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Cannot build a URL from {base}: {reason}")]
    Url { base: String, reason: String },
}

/// Convenience result type.
pub type RepoResult<T> = Result<T, RepoError>;
