//! Interactive REPL for the repo-resources MCP server.
//!
//! Launch with `repo-resources-mcp repl` to browse the configured repository
//! through the same dispatcher the transports use. Type `/help` for commands,
//! Tab for completion.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde_json::{json, Value};
use tokio::runtime::Handle;

use repo_resources::{FileContent, FileResource};

use crate::protocol::ProtocolHandler;
use crate::types::{JsonRpcRequest, JsonRpcResponse, RequestId, ResponseOutcome};

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/init", "Choose a repository: /init <owner> <repo> [branch]"),
    ("/list", "List resources in the repository"),
    ("/fetch", "Print one file: /fetch <path|uri>"),
    ("/dump", "Concatenate every listed file: /dump [output.md]"),
    ("/info", "Show server metadata and active repository"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion. Paths come from the last `/list`.
struct RepoHelper {
    known_paths: Rc<RefCell<Vec<String>>>,
}

impl Completer for RepoHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        let parts: Vec<&str> = input.splitn(2, ' ').collect();
        let cmd = parts[0];
        let args = if parts.len() > 1 { parts[1] } else { "" };

        if cmd == "/fetch" {
            let prefix_start = input.len() - args.len();
            let matches: Vec<Pair> = self
                .known_paths
                .borrow()
                .iter()
                .filter(|p| p.starts_with(args.trim()))
                .map(|p| Pair {
                    display: p.clone(),
                    replacement: p.clone(),
                })
                .collect();
            return Ok((prefix_start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for RepoHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for RepoHelper {}
impl Validator for RepoHelper {}
impl Helper for RepoHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// In-process client over the dispatcher.
struct ReplClient {
    handler: Arc<ProtocolHandler>,
    runtime: Handle,
    next_id: i64,
}

impl ReplClient {
    fn call(&mut self, method: &str, params: Option<Value>) -> JsonRpcResponse {
        let id = RequestId::Number(self.next_id);
        self.next_id += 1;
        let request = JsonRpcRequest::new(id, method, params);
        self.runtime.block_on(self.handler.handle_request(request))
    }

    fn list(&mut self) -> Result<Vec<FileResource>, String> {
        let response = self.call("resources/list", None);
        decode(response)
    }

    fn fetch(&mut self, uri: &str) -> Result<FileContent, String> {
        let response = self.call("resources/fetch", Some(json!({ "uri": uri })));
        decode(response)
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: JsonRpcResponse) -> Result<T, String> {
    match response.outcome {
        ResponseOutcome::Result(value) => serde_json::from_value(value).map_err(|e| e.to_string()),
        ResponseOutcome::Error(err) => Err(format!("[{}] {}", err.code, err.message)),
    }
}

/// Concatenate files as `### name` sections, the corpus shape a README
/// generator consumes.
pub fn render_bundle<'a, I>(files: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (name, content) in files {
        out.push_str(&format!("\n\n### {name}\n\n{content}"));
    }
    out
}

/// Run the interactive REPL. Must be called off the async runtime's worker
/// threads (e.g. inside `spawn_blocking`), since it blocks on `runtime`.
pub fn run(handler: Arc<ProtocolHandler>, runtime: Handle) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mrepo-resources-mcp v{}\x1b[0m \x1b[90m\u{2014} GitHub files as resources\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let known_paths = Rc::new(RefCell::new(Vec::new()));

    let mut rl: Editor<RepoHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(RepoHelper {
        known_paths: known_paths.clone(),
    }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".repo_resources_mcp_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let mut client = ReplClient {
        handler,
        runtime,
        next_id: 1,
    };
    let prompt = " \x1b[36mrepo>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(&mut client),
                    "init" => cmd_init(args, &mut client),
                    "list" | "ls" => cmd_list(&mut client, &known_paths),
                    "fetch" | "cat" => cmd_fetch(args, &mut client),
                    "dump" => cmd_dump(args, &mut client, &known_paths),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: after /list, Tab completes paths for /fetch.");
    eprintln!();
}

fn cmd_info(client: &mut ReplClient) {
    let (mode, repo) = {
        let session = client.runtime.block_on(client.handler.session().lock());
        (session.mode(), session.config().map(|c| c.slug()))
    };
    let extensions = client.handler.catalog().extensions().to_string();
    let meta = crate::types::InitializeResult::default_result();

    eprintln!();
    eprintln!(
        "  Server:     {} v{}",
        meta.server_info.name, meta.server_info.version
    );
    eprintln!("  Protocol:   {}", meta.protocol_version);
    eprintln!("  Mode:       {mode}");
    eprintln!(
        "  Repository: {}",
        repo.unwrap_or_else(|| "(not initialized)".to_string())
    );
    eprintln!("  Extensions: {extensions}");
    eprintln!();
}

fn cmd_init(args: &str, client: &mut ReplClient) {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 2 || parts.len() > 3 {
        eprintln!("  Usage: /init <owner> <repo> [branch]");
        return;
    }

    let mut params = json!({ "owner": parts[0], "repo": parts[1] });
    if let Some(branch) = parts.get(2) {
        params["branch"] = json!(branch);
    }

    let response = client.call("initialize", Some(params));
    match response.outcome {
        ResponseOutcome::Result(value) => match value.get("message").and_then(Value::as_str) {
            Some(message) => eprintln!("  {message}"),
            None => eprintln!(
                "  Repository is fixed for this server; /init only works with --mode configurable."
            ),
        },
        ResponseOutcome::Error(err) => eprintln!("  Error [{}]: {}", err.code, err.message),
    }
}

fn cmd_list(client: &mut ReplClient, known_paths: &Rc<RefCell<Vec<String>>>) {
    match client.list() {
        Ok(resources) => {
            eprintln!();
            eprintln!("  {} resources:", resources.len());
            eprintln!();
            for resource in &resources {
                eprintln!("    {}", resource.name);
            }
            eprintln!();
            *known_paths.borrow_mut() = resources.into_iter().map(|r| r.name).collect();
        }
        Err(e) => eprintln!("  Error {e}"),
    }
}

fn cmd_fetch(args: &str, client: &mut ReplClient) {
    if args.is_empty() {
        eprintln!("  Usage: /fetch <path|uri>");
        return;
    }

    let uri = match to_uri(args, client) {
        Some(uri) => uri,
        None => {
            eprintln!("  No repository configured. Use /init first.");
            return;
        }
    };

    match client.fetch(&uri) {
        Ok(file) => println!("{}", file.content),
        Err(e) => eprintln!("  Error {e}"),
    }
}

fn cmd_dump(args: &str, client: &mut ReplClient, known_paths: &Rc<RefCell<Vec<String>>>) {
    let resources = match client.list() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("  Error {e}");
            return;
        }
    };
    *known_paths.borrow_mut() = resources.iter().map(|r| r.name.clone()).collect();

    let mut files = Vec::with_capacity(resources.len());
    for resource in &resources {
        match client.fetch(&resource.uri) {
            Ok(file) => files.push((resource.name.clone(), file.content)),
            Err(e) => {
                eprintln!("  Error fetching {}: {e}", resource.name);
                return;
            }
        }
    }

    let bundle = render_bundle(files.iter().map(|(n, c)| (n.as_str(), c.as_str())));

    if args.is_empty() {
        println!("{bundle}");
    } else {
        let path = args.split_whitespace().next().unwrap_or(args);
        match std::fs::write(path, &bundle) {
            Ok(()) => eprintln!("  Wrote {} files ({} bytes) to {path}", files.len(), bundle.len()),
            Err(e) => eprintln!("  Failed to write {path}: {e}"),
        }
    }
}

/// Accept either a full `github://` URI or a repository-relative path.
fn to_uri(arg: &str, client: &ReplClient) -> Option<String> {
    if arg.starts_with(repo_resources::uri::URI_SCHEME) {
        return Some(arg.to_string());
    }
    let session = client.runtime.block_on(client.handler.session().lock());
    session
        .config()
        .map(|cfg| repo_resources::resource_uri(cfg, arg))
}
