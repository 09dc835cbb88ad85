//! File-extension allow-list used to decide which blobs become resources.

use std::fmt;
use std::str::FromStr;

use crate::types::{RepoError, RepoResult};

/// Source-code preset.
pub const SOURCE_EXTENSIONS: &[&str] = &[".py", ".js", ".ts", ".cpp", ".c", ".rs"];

/// Plain-text preset.
pub const TEXT_EXTENSIONS: &[&str] = &[".txt", ".py"];

/// Case-sensitive set of extensions, each including its leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionAllowList {
    extensions: Vec<String>,
}

impl ExtensionAllowList {
    pub fn new<I, S>(extensions: I) -> RepoResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim();
            if ext.is_empty() {
                continue;
            }
            if ext.len() < 2 || !ext.starts_with('.') || ext[1..].contains('.') {
                return Err(RepoError::InvalidConfig(format!(
                    "extension must look like \".ext\", got \"{ext}\""
                )));
            }
            if !list.iter().any(|e| e == ext) {
                list.push(ext.to_string());
            }
        }

        if list.is_empty() {
            return Err(RepoError::InvalidConfig(
                "extension allow-list must not be empty".to_string(),
            ));
        }

        Ok(Self { extensions: list })
    }

    pub fn source() -> Self {
        Self::from_static(SOURCE_EXTENSIONS)
    }

    pub fn text() -> Self {
        Self::from_static(TEXT_EXTENSIONS)
    }

    fn from_static(extensions: &[&str]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Whether the path's final dot-segment is allowed.
    pub fn allows(&self, path: &str) -> bool {
        let ext = extension_of(path);
        self.extensions.iter().any(|e| *e == ext)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.extensions
    }
}

impl Default for ExtensionAllowList {
    fn default() -> Self {
        Self::source()
    }
}

/// Accepts a preset name (`source`, `text`) or a comma-separated list.
impl FromStr for ExtensionAllowList {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "source" => Ok(Self::source()),
            "text" => Ok(Self::text()),
            list => Self::new(list.split(',')),
        }
    }
}

impl fmt::Display for ExtensionAllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extensions.join(","))
    }
}

/// `"." + everything after the last dot`. A path without a dot yields
/// `"." + path`, which no sane allow-list contains.
pub fn extension_of(path: &str) -> String {
    let tail = path.rsplit('.').next().unwrap_or(path);
    format!(".{tail}")
}
