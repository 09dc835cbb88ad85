//! Main request dispatcher. Routes each JSON-RPC request to its handler.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::Value;

use repo_resources::{RepoCatalog, RepoConfig};

use crate::resources::ResourceRegistry;
use crate::session::{InitializeMode, RepoSessionManager};
use crate::transport::framing;
use crate::types::*;

/// Dispatches requests. Every call yields exactly one response envelope.
pub struct ProtocolHandler {
    session: Arc<Mutex<RepoSessionManager>>,
    resources: ResourceRegistry,
}

impl ProtocolHandler {
    pub fn new(session: Arc<Mutex<RepoSessionManager>>, catalog: RepoCatalog) -> Self {
        Self {
            session,
            resources: ResourceRegistry::new(catalog),
        }
    }

    pub fn session(&self) -> &Arc<Mutex<RepoSessionManager>> {
        &self.session
    }

    pub fn catalog(&self) -> &RepoCatalog {
        self.resources.catalog()
    }

    /// Handle one raw message. Unparseable input answers with a null id.
    pub async fn handle_text(&self, text: &str) -> JsonRpcResponse {
        match framing::parse_message(text) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                tracing::warn!("Rejected message: {e}");
                e.to_json_rpc_error(RequestId::Null)
            }
        }
    }

    /// Request errors echo the id; upstream and internal faults answer with
    /// a null id, the same envelope a caught panic gets.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        tracing::debug!("-> {} (id {id})", request.method);

        match self.dispatch_request(&request).await {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) if e.is_fault() => {
                tracing::warn!("<- {} (id {id}) failed: {e}", request.method);
                e.to_json_rpc_error(RequestId::Null)
            }
            Err(e) => {
                tracing::debug!("<- {} failed: {e}", request.method);
                e.to_json_rpc_error(id)
            }
        }
    }

    async fn dispatch_request(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params.clone()).await,
            "resources/list" => self.handle_resources_list().await,
            "resources/fetch" => self.handle_resources_fetch(request.params.clone()).await,
            _ => Err(McpError::MethodNotFound(request.method.clone())),
        }
    }

    async fn handle_initialize(&self, params: Option<Value>) -> McpResult<Value> {
        let mode = self.session.lock().await.mode();
        match mode {
            InitializeMode::Fixed => {
                serde_json::to_value(InitializeResult::default_result())
                    .map_err(|e| McpError::InternalError(e.to_string()))
            }
            InitializeMode::Configurable => self.handle_configure(params).await,
        }
    }

    /// Configurable-mode `initialize`: validate everything before touching state.
    async fn handle_configure(&self, params: Option<Value>) -> McpResult<Value> {
        let init_params: RepoInitializeParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| {
                McpError::InvalidParams("initialize requires owner and repo".to_string())
            })?;

        let owner = required_field(init_params.owner, "owner")?;
        let repo = required_field(init_params.repo, "repo")?;
        let config = RepoConfig::new(&owner, &repo, init_params.branch.as_deref())
            .map_err(|e| McpError::InvalidParams(e.to_string()))?;

        let message = format!(
            "Initialized GitHub repo {}/{} on branch {}",
            config.owner, config.repo, config.branch
        );

        self.session.lock().await.reconfigure(config)?;

        serde_json::to_value(ConfiguredResult { message })
            .map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_resources_list(&self) -> McpResult<Value> {
        let config = self.session.lock().await.require_config()?;
        let resources = self.resources.list(&config).await?;
        serde_json::to_value(resources).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_resources_fetch(&self, params: Option<Value>) -> McpResult<Value> {
        let fetch_params: ResourceFetchParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("resources/fetch requires uri".to_string()))?;

        let config = self.session.lock().await.require_config()?;
        let content = self.resources.fetch(&config, &fetch_params.uri).await?;
        serde_json::to_value(content).map_err(|e| McpError::InternalError(e.to_string()))
    }
}

fn required_field(value: Option<String>, name: &str) -> McpResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| McpError::InvalidParams(format!("{name} is required")))
}
