//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit flag, then environment, then default.

use std::sync::Arc;

use tokio::sync::Mutex;

use repo_resources::{
    ExtensionAllowList, GitHubGateway, RepoCatalog, RepoConfig, GITHUB_API_BASE, GITHUB_RAW_BASE,
};

use crate::protocol::ProtocolHandler;
use crate::session::{InitializeMode, RepoSessionManager};
use crate::types::{McpError, McpResult};

pub const ENV_OWNER: &str = "GITHUB_OWNER";
pub const ENV_REPO: &str = "GITHUB_REPO";
pub const ENV_BRANCH: &str = "GITHUB_BRANCH";
pub const ENV_MODE: &str = "REPO_SERVER_MODE";
pub const ENV_EXTENSIONS: &str = "REPO_EXTENSIONS";
pub const ENV_API_BASE: &str = "GITHUB_API_BASE";
pub const ENV_RAW_BASE: &str = "GITHUB_RAW_BASE";

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub mode: Option<String>,
    pub extensions: Option<String>,
    pub api_base: Option<String>,
    pub raw_base: Option<String>,
}

/// Fully resolved server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub mode: InitializeMode,
    pub repo: Option<RepoConfig>,
    pub extensions: ExtensionAllowList,
    pub api_base: String,
    pub raw_base: String,
}

impl ServerSettings {
    /// Resolve against the process environment.
    pub fn resolve(overrides: &SettingsOverrides) -> McpResult<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with<F>(overrides: &SettingsOverrides, env: F) -> McpResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: &Option<String>, key: &str| -> Option<String> {
            explicit
                .clone()
                .or_else(|| env(key))
                .filter(|v| !v.trim().is_empty())
        };

        let mode = match pick(&overrides.mode, ENV_MODE) {
            Some(m) => m.parse::<InitializeMode>().map_err(McpError::Config)?,
            None => InitializeMode::default(),
        };

        let extensions = match pick(&overrides.extensions, ENV_EXTENSIONS) {
            Some(list) => list
                .parse::<ExtensionAllowList>()
                .map_err(|e| McpError::Config(e.to_string()))?,
            None => ExtensionAllowList::default(),
        };

        let owner = pick(&overrides.owner, ENV_OWNER);
        let repo_name = pick(&overrides.repo, ENV_REPO);
        let branch = pick(&overrides.branch, ENV_BRANCH);

        let repo = match (owner, repo_name) {
            (Some(owner), Some(repo)) => Some(
                RepoConfig::new(&owner, &repo, branch.as_deref())
                    .map_err(|e| McpError::Config(e.to_string()))?,
            ),
            (None, None) => None,
            (Some(_), None) => {
                return Err(McpError::Config(format!(
                    "--owner given without --repo (or {ENV_REPO})"
                )))
            }
            (None, Some(_)) => {
                return Err(McpError::Config(format!(
                    "--repo given without --owner (or {ENV_OWNER})"
                )))
            }
        };

        if mode == InitializeMode::Fixed && repo.is_none() {
            return Err(McpError::Config(format!(
                "fixed mode needs a repository: pass --owner and --repo (or set {ENV_OWNER} and {ENV_REPO}), \
                 or use --mode configurable"
            )));
        }

        Ok(Self {
            mode,
            repo,
            extensions,
            api_base: pick(&overrides.api_base, ENV_API_BASE)
                .unwrap_or_else(|| GITHUB_API_BASE.to_string()),
            raw_base: pick(&overrides.raw_base, ENV_RAW_BASE)
                .unwrap_or_else(|| GITHUB_RAW_BASE.to_string()),
        })
    }

    pub fn session(&self) -> RepoSessionManager {
        match (self.mode, &self.repo) {
            (InitializeMode::Fixed, Some(cfg)) => RepoSessionManager::fixed(cfg.clone()),
            _ => RepoSessionManager::configurable(self.repo.clone()),
        }
    }

    pub fn catalog(&self) -> RepoCatalog {
        let gateway = GitHubGateway::with_base_urls(&self.api_base, &self.raw_base);
        RepoCatalog::new(Arc::new(gateway), self.extensions.clone())
    }

    /// Dispatcher wired to GitHub with these settings.
    pub fn build_handler(&self) -> ProtocolHandler {
        ProtocolHandler::new(Arc::new(Mutex::new(self.session())), self.catalog())
    }
}
