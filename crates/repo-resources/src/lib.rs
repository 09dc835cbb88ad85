//! repo-resources: GitHub tree listing, extension filtering, and raw file retrieval.

pub mod catalog;
pub mod extensions;
pub mod gateway;
pub mod github;
pub mod types;
pub mod uri;

pub use catalog::RepoCatalog;
pub use extensions::{extension_of, ExtensionAllowList};
pub use gateway::ContentGateway;
pub use github::{GitHubGateway, GITHUB_API_BASE, GITHUB_RAW_BASE};
pub use types::*;
pub use uri::{resolve_path, resource_uri, uri_prefix};
