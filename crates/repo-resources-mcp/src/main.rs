//! repo-resources MCP server entry point.

use std::sync::Arc;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use repo_resources_mcp::config::{ServerSettings, SettingsOverrides, ENV_MODE};
use repo_resources_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "repo-resources-mcp",
    about = "MCP server exposing a GitHub repository's files as resources",
    version
)]
struct Cli {
    #[command(flatten)]
    repo: RepoArgs,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct RepoArgs {
    /// Repository owner. Also reads GITHUB_OWNER.
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Repository name. Also reads GITHUB_REPO.
    #[arg(long, global = true)]
    repo: Option<String>,

    /// Branch to mirror (default: main). Also reads GITHUB_BRANCH.
    #[arg(long, global = true)]
    branch: Option<String>,

    /// How `initialize` behaves: fixed (repository set here) or
    /// configurable (repository set by the client). Also reads REPO_SERVER_MODE.
    #[arg(long, global = true)]
    mode: Option<String>,

    /// Allowed file extensions: `source`, `text`, or a list like `.py,.rs`.
    /// Also reads REPO_EXTENSIONS.
    #[arg(long, global = true)]
    extensions: Option<String>,

    /// GitHub API base URL. Also reads GITHUB_API_BASE.
    #[arg(long, global = true, hide = true)]
    api_base: Option<String>,

    /// Raw-content base URL. Also reads GITHUB_RAW_BASE.
    #[arg(long, global = true, hide = true)]
    raw_base: Option<String>,
}

impl From<RepoArgs> for SettingsOverrides {
    fn from(args: RepoArgs) -> Self {
        Self {
            owner: args.owner,
            repo: args.repo,
            branch: args.branch,
            mode: args.mode,
            extensions: args.extensions,
            api_base: args.api_base,
            raw_base: args.raw_base,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Start MCP server over HTTP (POST /rpc).
    #[cfg(feature = "http")]
    ServeHttp {
        /// Listen address (host:port).
        #[arg(long, default_value = repo_resources_mcp::transport::http::DEFAULT_HTTP_ADDR)]
        addr: String,
    },

    /// Print server metadata and resolved settings as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   repo-resources-mcp completions bash > ~/.local/share/bash-completion/completions/repo-resources-mcp
    ///   repo-resources-mcp completions zsh > ~/.zfunc/_repo-resources-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let overrides = SettingsOverrides::from(cli.repo.clone());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let settings = ServerSettings::resolve(&overrides)?;
            let handler = Arc::new(settings.build_handler());
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        #[cfg(feature = "http")]
        Commands::ServeHttp { addr } => {
            use repo_resources_mcp::transport::HttpTransport;

            let settings = ServerSettings::resolve(&overrides)?;
            tracing::info!("repo-resources MCP server ({} mode)", settings.mode);
            tracing::info!("Extensions: {}", settings.extensions);
            let handler = Arc::new(settings.build_handler());
            let transport = HttpTransport::new(handler);
            transport.run(&addr).await?;
        }

        Commands::Info => {
            let settings = ServerSettings::resolve(&overrides)?;
            let meta = repo_resources_mcp::types::InitializeResult::default_result();
            let info = serde_json::json!({
                "server": meta.server_info,
                "protocol_version": meta.protocol_version,
                "capabilities": meta.capabilities,
                "mode": settings.mode.to_string(),
                "repository": settings.repo,
                "extensions": settings.extensions.as_slice(),
                "methods": ["initialize", "resources/list", "resources/fetch"],
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                shell,
                &mut cmd,
                "repo-resources-mcp",
                &mut std::io::stdout(),
            );
        }

        Commands::Repl => {
            // Default to configurable so /init works.
            let mut overrides = overrides;
            if overrides.mode.is_none() && std::env::var(ENV_MODE).is_err() {
                overrides.mode = Some("configurable".to_string());
            }
            let settings = ServerSettings::resolve(&overrides)?;
            let handler = Arc::new(settings.build_handler());
            let runtime = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || repo_resources_mcp::repl::run(handler, runtime))
                .await??;
        }
    }

    Ok(())
}
