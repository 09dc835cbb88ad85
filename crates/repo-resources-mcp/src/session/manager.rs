//! Active repository configuration and how `initialize` may change it.

use std::fmt;
use std::str::FromStr;

use repo_resources::RepoConfig;

use crate::types::{McpError, McpResult};

/// How `initialize` behaves for this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitializeMode {
    /// Repository fixed at startup; `initialize` returns server metadata.
    #[default]
    Fixed,
    /// Repository chosen by the client through `initialize` params.
    Configurable,
}

impl FromStr for InitializeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "configurable" => Ok(Self::Configurable),
            other => Err(format!(
                "unknown mode \"{other}\" (expected fixed or configurable)"
            )),
        }
    }
}

impl fmt::Display for InitializeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Configurable => write!(f, "configurable"),
        }
    }
}

/// Holds the one repository configuration a process serves.
#[derive(Debug, Clone)]
pub struct RepoSessionManager {
    mode: InitializeMode,
    config: Option<RepoConfig>,
}

impl RepoSessionManager {
    /// A fixed-mode session. The configuration never changes.
    pub fn fixed(config: RepoConfig) -> Self {
        tracing::info!("Serving {} (fixed)", config.slug());
        Self {
            mode: InitializeMode::Fixed,
            config: Some(config),
        }
    }

    /// A configurable-mode session, optionally seeded.
    pub fn configurable(initial: Option<RepoConfig>) -> Self {
        match &initial {
            Some(cfg) => tracing::info!("Serving {} until reconfigured", cfg.slug()),
            None => tracing::info!("Waiting for initialize to choose a repository"),
        }
        Self {
            mode: InitializeMode::Configurable,
            config: initial,
        }
    }

    pub fn mode(&self) -> InitializeMode {
        self.mode
    }

    pub fn config(&self) -> Option<&RepoConfig> {
        self.config.as_ref()
    }

    /// Clone of the active configuration, or `NotInitialized`.
    pub fn require_config(&self) -> McpResult<RepoConfig> {
        self.config.clone().ok_or(McpError::NotInitialized)
    }

    /// Replace the active configuration. Only configurable sessions allow it.
    pub fn reconfigure(&mut self, config: RepoConfig) -> McpResult<()> {
        if self.mode != InitializeMode::Configurable {
            return Err(McpError::InvalidParams(
                "repository is fixed for this server".to_string(),
            ));
        }

        match &self.config {
            Some(previous) if *previous != config => {
                tracing::info!("Reconfigured {} -> {}", previous.slug(), config.slug());
            }
            Some(_) => tracing::debug!("Reconfigured with unchanged {}", config.slug()),
            None => tracing::info!("Configured {}", config.slug()),
        }

        self.config = Some(config);
        Ok(())
    }
}
