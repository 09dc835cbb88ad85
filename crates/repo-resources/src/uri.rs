//! `github://{owner}/{repo}/{path}` resource addressing.

use crate::types::{RepoConfig, RepoError, RepoResult};

pub const URI_SCHEME: &str = "github://";

/// Prefix shared by every resource of the configured repository.
pub fn uri_prefix(config: &RepoConfig) -> String {
    format!("{URI_SCHEME}{}/{}/", config.owner, config.repo)
}

pub fn resource_uri(config: &RepoConfig, path: &str) -> String {
    format!("{}{path}", uri_prefix(config))
}

/// Recover the repository-relative path from a resource URI.
///
/// The URI must belong to the configured owner/repo and name a non-empty path.
pub fn resolve_path<'a>(config: &RepoConfig, uri: &'a str) -> RepoResult<&'a str> {
    let prefix = uri_prefix(config);
    match uri.strip_prefix(prefix.as_str()) {
        Some(path) if !path.is_empty() => Ok(path),
        Some(_) => Err(RepoError::InvalidUri(format!("{uri} names no file"))),
        None => Err(RepoError::InvalidUri(format!(
            "{uri} is outside {prefix}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> RepoConfig {
        RepoConfig::new("a", "b", None).unwrap()
    }

    #[test]
    fn test_resource_uri() {
        assert_eq!(resource_uri(&cfg(), "src/main.py"), "github://a/b/src/main.py");
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(resolve_path(&cfg(), "github://a/b/main.py").unwrap(), "main.py");
        assert_eq!(
            resolve_path(&cfg(), "github://a/b/deep/dir/x.rs").unwrap(),
            "deep/dir/x.rs"
        );
    }

    #[test]
    fn test_resolve_rejects_other_repository() {
        assert!(resolve_path(&cfg(), "github://a/c/main.py").is_err());
        assert!(resolve_path(&cfg(), "https://a/b/main.py").is_err());
        assert!(resolve_path(&cfg(), "github://a/b/").is_err());
    }
}
