//! Resource listing and fetch dispatch.

use repo_resources::{FileContent, FileResource, RepoCatalog, RepoConfig};

use crate::types::McpResult;

/// Bridges the repository catalog into server results.
pub struct ResourceRegistry {
    catalog: RepoCatalog,
}

impl ResourceRegistry {
    pub fn new(catalog: RepoCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RepoCatalog {
        &self.catalog
    }

    pub async fn list(&self, config: &RepoConfig) -> McpResult<Vec<FileResource>> {
        let resources = self.catalog.list(config).await.map_err(|e| {
            tracing::warn!("Listing {} failed: {e}", config.slug());
            e
        })?;
        Ok(resources)
    }

    pub async fn fetch(&self, config: &RepoConfig, uri: &str) -> McpResult<FileContent> {
        let content = self.catalog.fetch(config, uri).await.map_err(|e| {
            tracing::warn!("Fetching {uri} failed: {e}");
            e
        })?;
        Ok(content)
    }
}
