//! repo-resources MCP server: list and fetch GitHub repository files over JSON-RPC.

pub mod config;
pub mod protocol;
pub mod repl;
pub mod resources;
pub mod session;
pub mod transport;
pub mod types;

pub use config::{ServerSettings, SettingsOverrides};
pub use protocol::ProtocolHandler;
pub use session::{InitializeMode, RepoSessionManager};
pub use transport::StdioTransport;
