//! Access to a repository host's tree listing and raw file contents.

use async_trait::async_trait;

use crate::types::{RepoConfig, RepoResult, TreeListing};

/// Outbound calls the catalog needs from a repository host.
///
/// [`crate::GitHubGateway`] is the production implementation.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Recursive listing of every entry on the configured branch.
    async fn list_tree(&self, config: &RepoConfig) -> RepoResult<TreeListing>;

    /// Raw contents of one file, decoded as text.
    async fn fetch_raw(&self, config: &RepoConfig, path: &str) -> RepoResult<String>;
}
