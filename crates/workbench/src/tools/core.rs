//! Tool abstraction and the name → tool registry.
//!
//! The [`Tool`] trait defines the interface every tool implements: a static
//! definition (name, description, JSON schema) and an async `execute` method
//! that always resolves to a string. Tools are collected into a [`ToolSet`]
//! which handles dispatch by name, schema validation, logging, and optional
//! result truncation.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{Instrument, debug, info, info_span, trace};

use crate::error::ToolError;
use crate::session::SessionContext;
use crate::tools::search::{BraveSearch, SearchProvider};
use crate::workspace::Workspace;
use crate::{ToolCall, ToolDef};

/// Boxed future returned by [`Tool::execute`].
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = String> + Send + 'a>>;

/// Wall-clock budget for `run_command`.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Default blocked shell command patterns (lowercased substrings).
///
/// Device patterns name block devices only, so redirects to `/dev/null`
/// still run.
pub const DEFAULT_BLOCKED_COMMANDS: &[&str] = &[
    "rm -rf /",
    "mkfs",
    "> /dev/sd",
    "> /dev/nvme",
    "of=/dev/sd",
];

/// Maximum number of hits `web_search` returns.
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 5;

// ── WorkspaceToolsConfig ─────────────────────────────────────────────

/// Configuration for [`ToolSet::with_workspace_tools`].
///
/// ```ignore
/// let config = WorkspaceToolsConfig::default()
///     .command_timeout(Duration::from_secs(30))
///     .block_command("shutdown");
/// ```
#[derive(Clone)]
pub struct WorkspaceToolsConfig {
    /// Default: [`DEFAULT_COMMAND_TIMEOUT`] (60 seconds).
    pub command_timeout: Duration,
    /// Default: [`DEFAULT_BLOCKED_COMMANDS`].
    pub blocked_commands: Vec<String>,
    /// Default: [`DEFAULT_MAX_SEARCH_RESULTS`] (5).
    pub max_search_results: usize,
    /// Search backend. When `None`, [`BraveSearch::from_env`] is tried and
    /// `web_search` is registered disabled if that fails too.
    pub search_provider: Option<Arc<dyn SearchProvider>>,
}

impl Default for WorkspaceToolsConfig {
    fn default() -> Self {
        Self {
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            blocked_commands: DEFAULT_BLOCKED_COMMANDS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            search_provider: None,
        }
    }
}

impl fmt::Debug for WorkspaceToolsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceToolsConfig")
            .field("command_timeout", &self.command_timeout)
            .field("blocked_commands", &self.blocked_commands)
            .field("max_search_results", &self.max_search_results)
            .field("search_provider", &self.search_provider.is_some())
            .finish()
    }
}

impl WorkspaceToolsConfig {
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Replace the blocked command list.
    pub fn blocked_commands(mut self, patterns: Vec<String>) -> Self {
        self.blocked_commands = patterns;
        self
    }

    /// Add a single blocked command pattern.
    pub fn block_command(mut self, pattern: impl Into<String>) -> Self {
        self.blocked_commands.push(pattern.into());
        self
    }

    pub fn max_search_results(mut self, max: usize) -> Self {
        self.max_search_results = max;
        self
    }

    pub fn search_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search_provider = Some(provider);
        self
    }
}

// ── Tool trait ─────────────────────────────────────────────────────

/// A named operation the agent runtime can invoke.
///
/// `execute` receives the session the call belongs to and the raw JSON
/// arguments string. It must always resolve to a string: failures are
/// returned as `"Error: ..."` text, never panics or propagated errors.
pub trait Tool: Send + Sync {
    /// The definition advertised to the agent runtime.
    fn definition(&self) -> ToolDef;

    fn execute<'a>(&'a self, ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a>;

    fn name(&self) -> String {
        self.definition().function.name
    }
}

// ── ToolSet ────────────────────────────────────────────────────────

/// Registry of tools dispatched by name.
///
/// Built once at startup and then only read.
///
/// ```ignore
/// let tools = ToolSet::new()
///     .with_arg_validation(true)
///     .with_workspace_tools(Workspace::new("."), WorkspaceToolsConfig::default());
/// let text = tools.execute(&session, "list_files", "{}").await;
/// ```
pub struct ToolSet {
    tools: BTreeMap<String, Box<dyn Tool>>,
    /// Truncate results above this many bytes. `None` returns results whole.
    max_result_bytes: Option<usize>,
    /// Validate arguments against each tool's JSON Schema before execution.
    validate_args: bool,
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("max_result_bytes", &self.max_result_bytes)
            .field("validate_args", &self.validate_args)
            .finish()
    }
}

impl ToolSet {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
            max_result_bytes: None,
            validate_args: false,
        }
    }

    pub fn with_max_result_bytes(mut self, max: Option<usize>) -> Self {
        self.max_result_bytes = max;
        self
    }

    pub fn with_arg_validation(mut self, enabled: bool) -> Self {
        self.validate_args = enabled;
        self
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name();
        debug!("Registering tool {name}");
        self.tools.insert(name, Box::new(tool));
    }

    /// Register a tool (builder pattern).
    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.register(tool);
        self
    }

    /// Register a tool only when `condition` holds.
    pub fn with_if(self, condition: bool, tool: impl Tool + 'static) -> Self {
        if condition { self.with(tool) } else { self }
    }

    /// Register the twelve filesystem, process, search, and plan tools, all
    /// rooted at `workspace`.
    pub fn with_workspace_tools(self, workspace: Workspace, config: WorkspaceToolsConfig) -> Self {
        use crate::plan::{CreatePlan, UpdatePlan};
        use crate::tools::fs::{
            AppendFile, DeleteDir, DeleteFile, ListDir, ListFiles, MakeDir, ReadFile, WriteFile,
        };
        use crate::tools::search::WebSearch;
        use crate::tools::shell::RunCommand;

        let provider = config.search_provider.clone().or_else(|| {
            BraveSearch::from_env().map(|b| Arc::new(b) as Arc<dyn SearchProvider>)
        });

        info!(
            "Registering workspace tools rooted at {}",
            workspace.root().display()
        );
        let set = self
            .with(ReadFile::new(workspace.clone()))
            .with(WriteFile::new(workspace.clone()))
            .with(AppendFile::new(workspace.clone()))
            .with(DeleteFile::new(workspace.clone()))
            .with(ListFiles::new(workspace.clone()))
            .with(ListDir::new(workspace.clone()))
            .with(MakeDir::new(workspace.clone()))
            .with(DeleteDir::new(workspace.clone()))
            .with(
                RunCommand::new(workspace.clone())
                    .timeout(config.command_timeout)
                    .blocked_commands(config.blocked_commands),
            )
            .with(CreatePlan::new(workspace.clone()))
            .with(UpdatePlan::new(workspace));

        match provider {
            Some(p) => set.with(WebSearch::new(p).max_results(config.max_search_results)),
            None => {
                info!("No search provider configured; web_search is disabled");
                set.with(DisabledTool::new(
                    WebSearch::tool_def(),
                    "web search is not configured. Set BRAVE_SEARCH_KEY to enable it.",
                ))
            }
        }
    }

    /// All tool definitions, ordered by name.
    pub fn definitions(&self) -> Vec<ToolDef> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a [`ToolCall`] received from the runtime.
    pub async fn dispatch(&self, ctx: &SessionContext, call: &ToolCall) -> String {
        let arguments = call.arguments.to_string();
        self.execute(ctx, &call.name, &arguments).await
    }

    /// Execute a tool by name with raw JSON arguments.
    ///
    /// Always returns a string: unknown names, schema violations, and tool
    /// failures all come back as `"Error: ..."` text.
    pub async fn execute(&self, ctx: &SessionContext, name: &str, arguments: &str) -> String {
        let span = info_span!(
            "tool",
            name,
            session = %ctx.session_id,
            user = %ctx.user_id
        );
        self.execute_in_span(ctx, name, arguments)
            .instrument(span)
            .await
    }

    async fn execute_in_span(&self, ctx: &SessionContext, name: &str, arguments: &str) -> String {
        let Some(tool) = self.tools.get(name) else {
            return format!("Error: unknown tool '{name}'");
        };

        if self.validate_args
            && let Some(error) = validate_tool_arguments(tool.as_ref(), arguments)
        {
            debug!("Tool {name} rejected arguments");
            return error;
        }

        log_tool_call(name, arguments);
        let start = Instant::now();
        let result = tool.execute(ctx, arguments).await;

        debug!(
            "Tool {name} completed in {:.0}ms ({} bytes)",
            start.elapsed().as_secs_f64() * 1000.0,
            result.len()
        );
        trace!("Tool {name} result: {result}");

        match self.max_result_bytes {
            Some(max) => truncate_result(result, max),
            None => result,
        }
    }
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── DisabledTool ───────────────────────────────────────────────────

/// A tool that keeps its name and schema visible but always answers with an
/// error explaining why it is unavailable.
pub struct DisabledTool {
    def: ToolDef,
    reason: String,
}

impl DisabledTool {
    pub fn new(def: ToolDef, reason: impl Into<String>) -> Self {
        Self {
            def,
            reason: reason.into(),
        }
    }

    /// Disable an existing tool, reusing its definition.
    pub fn from_tool(tool: &dyn Tool, reason: impl Into<String>) -> Self {
        Self::new(tool.definition(), reason)
    }
}

impl Tool for DisabledTool {
    fn definition(&self) -> ToolDef {
        self.def.clone()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, _arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move { format!("Error: {}", self.reason) })
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Validate tool arguments against the tool's declared JSON Schema.
///
/// Returns `None` if valid, or `Some(error_string)` listing every violation.
pub fn validate_tool_arguments(tool: &dyn Tool, arguments: &str) -> Option<String> {
    let args_value: serde_json::Value = match serde_json::from_str(arguments) {
        Ok(v) => v,
        Err(e) => {
            return Some(format!(
                "Error: invalid JSON arguments for tool '{}': {e}. \
                 Please provide valid JSON matching the tool's parameter schema.",
                tool.name()
            ));
        }
    };

    let schema = tool.definition().function.parameters;
    // An unusable schema is the tool author's problem; let the call through.
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(_) => return None,
    };

    let errors: Vec<String> = validator
        .iter_errors(&args_value)
        .map(|e| format!("  - {}: {e}", e.instance_path()))
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(format!(
            "Error: argument validation failed for tool '{}':\n{}\n\
             Please fix the arguments and try again.",
            tool.name(),
            errors.join("\n")
        ))
    }
}

/// Log a tool call at INFO level with a truncated preview of arguments.
pub fn log_tool_call(name: &str, arguments: &str) {
    let args_preview: String = arguments.chars().take(120).collect();
    info!(
        "[tool] {name}({args_preview}{})",
        if arguments.chars().count() > 120 { "..." } else { "" }
    );
    trace!("[tool] {name} arguments: {arguments}");
}

/// Truncate a string to at most `max` bytes, appending a notice if trimmed.
/// The cut never splits a UTF-8 character.
pub fn truncate_result(s: String, max: usize) -> String {
    if s.len() <= max {
        return s;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    let total = s.len();
    let mut out = s;
    out.truncate(cut);
    out.push_str(&format!("...\n[truncated: {total} bytes total]"));
    out
}

/// Parse raw JSON arguments into a typed struct.
pub fn parse_tool_args<T: serde::de::DeserializeOwned>(arguments: &str) -> Result<T, ToolError> {
    serde_json::from_str(arguments).map_err(|e| {
        ToolError::InvalidArgument(format!(
            "invalid tool arguments: {e}. \
             Please provide valid JSON matching the tool's parameter schema."
        ))
    })
}

// ── Tests ──────────────────────────────────────────────────────────
