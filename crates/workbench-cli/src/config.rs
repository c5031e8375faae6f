//! CLI configuration with sensible defaults.
//!
//! [`CliConfig`] captures what the binary needs to host the tools and
//! converts it into `workbench` types via [`build_tool_set`](CliConfig::build_tool_set)
//! and [`session`](CliConfig::session).

use std::path::PathBuf;
use std::time::Duration;

use workbench::SessionContext;
use workbench::tools::{DEFAULT_COMMAND_TIMEOUT, ToolSet, WorkspaceToolsConfig};
use workbench::workspace::Workspace;

#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Workspace root. Default: `"."`.
    pub workdir: PathBuf,
    /// Recorded on every tool span. Default: `"1"`.
    pub user_id: String,
    /// `run_command` wall-clock budget. Default: 60 seconds.
    pub command_timeout: Duration,
    /// Truncate results above this size. Default: `None`.
    pub max_result_bytes: Option<usize>,
    /// Validate arguments against tool schemas. Default: `true`.
    pub validate_args: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            user_id: "1".to_string(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            max_result_bytes: None,
            validate_args: true,
        }
    }
}

impl CliConfig {
    /// Build a [`ToolSet`] with all workspace tools rooted at `workdir`.
    ///
    /// `web_search` uses Brave when `BRAVE_SEARCH_KEY` is set and is
    /// registered disabled otherwise.
    pub fn build_tool_set(&self) -> ToolSet {
        let tools_config = WorkspaceToolsConfig::default().command_timeout(self.command_timeout);
        ToolSet::new()
            .with_arg_validation(self.validate_args)
            .with_max_result_bytes(self.max_result_bytes)
            .with_workspace_tools(Workspace::new(&self.workdir), tools_config)
    }

    /// A fresh session for this run.
    pub fn session(&self) -> SessionContext {
        SessionContext::new(self.user_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workbench::tools::names;

    #[test]
    fn defaults() {
        let config = CliConfig::default();
        assert_eq!(config.workdir, PathBuf::from("."));
        assert_eq!(config.user_id, "1");
        assert_eq!(config.command_timeout, Duration::from_secs(60));
        assert!(config.max_result_bytes.is_none());
        assert!(config.validate_args);
    }

    #[test]
    fn build_tool_set_registers_every_tool() {
        let tools = CliConfig::default().build_tool_set();
        let defs = tools.definitions();
        let registered: Vec<&str> = defs.iter().map(|d| d.function.name.as_str()).collect();
        for name in names::ALL {
            assert!(registered.contains(name), "missing {name}");
        }
    }

    #[test]
    fn session_uses_configured_user() {
        let config = CliConfig {
            user_id: "alice".into(),
            ..Default::default()
        };
        let a = config.session();
        let b = config.session();
        assert_eq!(a.user_id, "alice");
        assert_ne!(a.session_id, b.session_id);
    }

    #[tokio::test]
    async fn validation_can_be_switched_off() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            workdir: dir.path().to_path_buf(),
            validate_args: false,
            ..Default::default()
        };
        let tools = config.build_tool_set();
        let result = tools
            .execute(&config.session(), names::READ_FILE, r#"{"path": 7}"#)
            .await;
        // The tool's own parser still rejects it, with its own wording.
        assert!(result.starts_with("Error: invalid tool arguments"), "got: {result}");
    }
}
