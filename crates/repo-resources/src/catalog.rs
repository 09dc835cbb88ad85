//! Resource listing and fetching over a [`ContentGateway`].

use std::sync::Arc;

use crate::extensions::ExtensionAllowList;
use crate::gateway::ContentGateway;
use crate::types::{FileContent, FileResource, RepoConfig, RepoResult, TEXT_PLAIN};
use crate::uri::{resolve_path, resource_uri};

/// Maps a repository's files to resources, filtered by an extension allow-list.
#[derive(Clone)]
pub struct RepoCatalog {
    gateway: Arc<dyn ContentGateway>,
    extensions: ExtensionAllowList,
}

impl RepoCatalog {
    pub fn new(gateway: Arc<dyn ContentGateway>, extensions: ExtensionAllowList) -> Self {
        Self {
            gateway,
            extensions,
        }
    }

    pub fn extensions(&self) -> &ExtensionAllowList {
        &self.extensions
    }

    /// One resource per allowed blob, in the order the host listed them.
    pub async fn list(&self, config: &RepoConfig) -> RepoResult<Vec<FileResource>> {
        let listing = self.gateway.list_tree(config).await?;
        let total = listing.tree.len();

        let resources: Vec<FileResource> = listing
            .tree
            .into_iter()
            .filter(|entry| entry.is_blob() && self.extensions.allows(&entry.path))
            .map(|entry| FileResource {
                uri: resource_uri(config, &entry.path),
                name: entry.path,
            })
            .collect();

        tracing::info!(
            "Listed {} of {total} entries in {}",
            resources.len(),
            config.slug()
        );

        Ok(resources)
    }

    /// Fetch a resource's text verbatim.
    pub async fn fetch(&self, config: &RepoConfig, uri: &str) -> RepoResult<FileContent> {
        let path = resolve_path(config, uri)?;
        let content = self.gateway.fetch_raw(config, path).await?;

        tracing::debug!("Fetched {uri} ({} bytes)", content.len());

        Ok(FileContent {
            uri: uri.to_string(),
            mime_type: TEXT_PLAIN.to_string(),
            content,
        })
    }
}
