//! GitHub REST + raw-content client.
//!
//! Unauthenticated, no timeouts, no retries. A slow upstream stalls only the
//! request waiting on it.

use async_trait::async_trait;
use reqwest::Url;

use crate::gateway::ContentGateway;
use crate::types::{RepoConfig, RepoError, RepoResult, TreeListing};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";

/// GitHub rejects API calls without a User-Agent.
const USER_AGENT: &str = concat!("repo-resources/", env!("CARGO_PKG_VERSION"));

/// [`ContentGateway`] backed by api.github.com and raw.githubusercontent.com.
#[derive(Clone)]
pub struct GitHubGateway {
    client: reqwest::Client,
    api_base: String,
    raw_base: String,
}

impl GitHubGateway {
    pub fn new() -> Self {
        Self::with_base_urls(GITHUB_API_BASE, GITHUB_RAW_BASE)
    }

    /// Point the gateway at other hosts (GitHub Enterprise, a local mock).
    pub fn with_base_urls(api_base: &str, raw_base: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            raw_base: raw_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn tree_url(&self, config: &RepoConfig) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, config.owner, config.repo, config.branch
        )
    }

    /// Raw-content URL with every path segment percent-encoded, so names
    /// holding `#`, `?` or spaces reach the host intact.
    pub fn raw_url(&self, config: &RepoConfig, path: &str) -> RepoResult<Url> {
        let url_error = |reason: String| RepoError::Url {
            base: self.raw_base.clone(),
            reason,
        };

        let mut url = Url::parse(&self.raw_base).map_err(|e| url_error(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| url_error("base cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(&config.owner)
            .push(&config.repo)
            .extend(config.branch.split('/'))
            .extend(path.split('/'));

        Ok(url)
    }

    async fn get(&self, url: &str) -> RepoResult<reqwest::Response> {
        tracing::debug!("GET {url}");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RepoError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

impl Default for GitHubGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentGateway for GitHubGateway {
    async fn list_tree(&self, config: &RepoConfig) -> RepoResult<TreeListing> {
        let url = self.tree_url(config);
        let body = self.get(&url).await?.text().await?;

        let listing: TreeListing = serde_json::from_str(&body).map_err(|e| RepoError::Decode {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if listing.truncated {
            tracing::warn!(
                "Tree for {} is truncated by GitHub; {} entries returned",
                config.slug(),
                listing.tree.len()
            );
        }

        Ok(listing)
    }

    async fn fetch_raw(&self, config: &RepoConfig, path: &str) -> RepoResult<String> {
        let url = self.raw_url(config, path)?;
        let content = self.get(url.as_str()).await?.text().await?;
        Ok(content)
    }
}
