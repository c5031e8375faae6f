//! Host the workbench tools for an agent runtime.
//!
//! Reads the Brave Search key from the `BRAVE_SEARCH_KEY` environment
//! variable. Logs go to stderr and are filtered by `RUST_LOG`.
//!
//! # Examples
//!
//! ```sh
//! # Print tool definitions
//! workbench --list-tools
//!
//! # One-shot call
//! workbench --call list_files --args '{}'
//!
//! # Serve JSON tool calls from stdin
//! workbench --workdir /path/to/project
//! ```

use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use workbench_cli::{CliConfig, repl};

/// Filesystem, shell, and plan tools for LLM agents.
#[derive(Parser)]
#[command(name = "workbench")]
struct Cli {
    /// Workspace root every tool path resolves against.
    #[arg(long, default_value = ".")]
    workdir: String,

    /// User id recorded in the session context.
    #[arg(long, default_value = "1")]
    user_id: String,

    /// Seconds before `run_command` kills a command.
    #[arg(long, default_value_t = 60)]
    command_timeout: u64,

    /// Truncate tool results above this many bytes.
    #[arg(long)]
    max_result_bytes: Option<usize>,

    /// Skip JSON Schema validation of tool arguments.
    #[arg(long)]
    no_validate: bool,

    /// Print every tool definition as JSON and exit.
    #[arg(long)]
    list_tools: bool,

    /// Run a single tool by name and print its result.
    #[arg(long)]
    call: Option<String>,

    /// JSON arguments for `--call`.
    #[arg(long, default_value = "{}", requires = "call")]
    args: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let workdir = match std::fs::canonicalize(&cli.workdir) {
        Ok(path) if path.is_dir() => path,
        Ok(path) => {
            eprintln!("Error: {} is not a directory", path.display());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: cannot open workdir {}: {e}", cli.workdir);
            std::process::exit(1);
        }
    };

    let config = CliConfig {
        workdir: workdir.clone(),
        user_id: cli.user_id,
        command_timeout: Duration::from_secs(cli.command_timeout),
        max_result_bytes: cli.max_result_bytes,
        validate_args: !cli.no_validate,
    };
    let tools = config.build_tool_set();
    let session = config.session();
    info!("{} tools ready in {}", tools.len(), workdir.display());

    if cli.list_tools {
        match serde_json::to_string_pretty(&tools.definitions()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize tool definitions: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Some(name) = &cli.call {
        println!("{}", tools.execute(&session, name, &cli.args).await);
        return;
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    if let Err(e) = repl::run(&tools, &session, stdin, tokio::io::stdout()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
