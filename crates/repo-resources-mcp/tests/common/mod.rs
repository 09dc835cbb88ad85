//! Shared fixtures: an in-memory repository host and handler builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use repo_resources::{
    ContentGateway, ExtensionAllowList, RepoCatalog, RepoConfig, RepoError, RepoResult, TreeEntry,
    TreeListing,
};
use repo_resources_mcp::protocol::ProtocolHandler;
use repo_resources_mcp::session::RepoSessionManager;

/// In-memory host. Records every raw path requested.
#[derive(Default)]
pub struct FakeGitHub {
    pub tree: Vec<TreeEntry>,
    pub files: HashMap<String, String>,
    pub fail_listing: bool,
    pub panic_listing: bool,
    pub requests: Mutex<Vec<String>>,
}

impl FakeGitHub {
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        Self {
            tree: files.iter().map(|(p, _)| TreeEntry::blob(p)).collect(),
            files: files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGateway for FakeGitHub {
    async fn list_tree(&self, config: &RepoConfig) -> RepoResult<TreeListing> {
        self.requests
            .lock()
            .unwrap()
            .push(format!("tree:{}", config.slug()));
        if self.panic_listing {
            panic!("tree listing exploded");
        }
        if self.fail_listing {
            return Err(RepoError::UpstreamStatus {
                url: format!("https://api.github.com/repos/{}/{}", config.owner, config.repo),
                status: 502,
            });
        }
        Ok(TreeListing {
            sha: None,
            tree: self.tree.clone(),
            truncated: false,
        })
    }

    async fn fetch_raw(&self, config: &RepoConfig, path: &str) -> RepoResult<String> {
        let url = format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{path}",
            config.owner, config.repo, config.branch
        );
        self.requests.lock().unwrap().push(url.clone());
        self.files
            .get(path)
            .cloned()
            .ok_or(RepoError::UpstreamStatus { url, status: 404 })
    }
}

pub fn catalog(host: &Arc<FakeGitHub>, extensions: ExtensionAllowList) -> RepoCatalog {
    RepoCatalog::new(host.clone(), extensions)
}

pub fn fixed_handler(host: &Arc<FakeGitHub>, extensions: ExtensionAllowList) -> ProtocolHandler {
    let cfg = RepoConfig::new("a", "b", None).unwrap();
    let session = RepoSessionManager::fixed(cfg);
    ProtocolHandler::new(
        Arc::new(tokio::sync::Mutex::new(session)),
        catalog(host, extensions),
    )
}

pub fn configurable_handler(
    host: &Arc<FakeGitHub>,
    extensions: ExtensionAllowList,
) -> ProtocolHandler {
    let session = RepoSessionManager::configurable(None);
    ProtocolHandler::new(
        Arc::new(tokio::sync::Mutex::new(session)),
        catalog(host, extensions),
    )
}

/// Build a JSON-RPC request.
pub fn rpc(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

/// Send a request value through the handler and return the envelope as JSON.
pub async fn send(handler: &ProtocolHandler, msg: Value) -> Value {
    handler.handle_text(&msg.to_string()).await.to_value()
}
