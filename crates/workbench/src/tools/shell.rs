//! `run_command`: one shell command under a wall-clock timeout.

use std::process::Stdio;
use std::time::Duration;

use schemars::JsonSchema;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::ToolDef;
use crate::error::{ToolError, render_result};
use crate::session::SessionContext;
use crate::tools::core::{
    DEFAULT_BLOCKED_COMMANDS, DEFAULT_COMMAND_TIMEOUT, Tool, ToolFuture, parse_tool_args,
};
use crate::tools::names;
use crate::tools::spec::ToolSpec;
use crate::workspace::Workspace;

/// Returned when a command succeeds without writing anything.
pub const NO_OUTPUT_MESSAGE: &str = "Command executed successfully with no output.";

/// Typed arguments for `run_command`.
#[derive(Deserialize, JsonSchema)]
pub struct RunCommandArgs {
    /// Shell command to execute (e.g. 'python3 main.py', 'ls -la snake_game').
    pub command: String,
}

/// Run `sh -c <command>` in the workspace root.
///
/// The shell and everything it forked are killed if they outlive the
/// timeout. Commands containing any blocked pattern (case-insensitive
/// substring) are refused before spawning.
pub struct RunCommand {
    workspace: Workspace,
    timeout: Duration,
    blocked_commands: Vec<String>,
}

impl RunCommand {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            timeout: DEFAULT_COMMAND_TIMEOUT,
            blocked_commands: DEFAULT_BLOCKED_COMMANDS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn blocked_commands(mut self, patterns: Vec<String>) -> Self {
        self.blocked_commands = patterns;
        self
    }

    pub fn block_command(mut self, pattern: impl Into<String>) -> Self {
        self.blocked_commands.push(pattern.into());
        self
    }

    fn is_blocked(&self, command: &str) -> bool {
        let lower = command.to_lowercase();
        self.blocked_commands
            .iter()
            .any(|p| lower.contains(&p.to_lowercase()))
    }

    async fn run(&self, arguments: &str) -> Result<String, ToolError> {
        let args: RunCommandArgs = parse_tool_args(arguments)?;
        if self.is_blocked(&args.command) {
            warn!("Blocked command: {}", args.command);
            return Err(ToolError::Blocked);
        }

        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(&args.command)
            .current_dir(self.workspace.root())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout can take down everything the shell forked.
        #[cfg(unix)]
        command.process_group(0);

        let child = command
            .spawn()
            .map_err(|e| ToolError::Execution(format!("failed to start command: {e}")))?;
        let pid = child.id();

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => {
                result.map_err(|e| ToolError::Execution(format!("command failed: {e}")))?
            }
            Err(_) => {
                warn!("Command timed out after {:?}: {}", self.timeout, args.command);
                kill_process_group(pid);
                return Err(ToolError::Timeout(self.timeout));
            }
        };
        debug!("Command exited with {}: {}", output.status, args.command);

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = format!("{stdout}{stderr}");

        if !output.status.success() {
            return Ok(format!("Command exited with {}:\n{combined}", output.status));
        }
        if combined.trim().is_empty() {
            return Ok(NO_OUTPUT_MESSAGE.to_string());
        }
        Ok(combined)
    }
}

impl Tool for RunCommand {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::RUN_COMMAND, "Run a shell command in the project directory")
            .when_to_use("When you need to run, build, or test code, or inspect the environment")
            .when_not_to_use(
                "When a dedicated tool exists. \
                 Use read_file, write_file, or list_dir for file work",
            )
            .parameters_for::<RunCommandArgs>()
            .example("run_command(command='python3 --version')", "Python 3.12.1")
            .output_format(format!(
                "Combined stdout and stderr. Commands are killed after {} seconds",
                self.timeout.as_secs()
            ))
            .to_tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move { render_result(self.run(arguments).await) })
    }
}

/// SIGKILL the process group led by `pid`.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pgid) = pid.and_then(|p| libc::pid_t::try_from(p).ok()) else {
        return;
    };
    // SAFETY: killpg takes plain integers and touches no memory. `process_group(0)`
    // made the child's pid its group id.
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc != 0 {
        // ESRCH when every member already exited.
        debug!("killpg({pgid}) failed: {}", std::io::Error::last_os_error());
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
