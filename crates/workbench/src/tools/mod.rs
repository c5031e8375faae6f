//! Tool abstractions and the built-in workspace tools.
//!
//! Every agent capability is a [`Tool`] implementor. Tools are collected into
//! a [`ToolSet`], which handles dispatch by name, argument validation,
//! logging, and optional truncation. A name the agent can see but not use
//! (e.g. `web_search` with no API key) is registered as a [`DisabledTool`].
//!
//! # Submodules
//!
//! - [`core`]: [`Tool`] trait, [`ToolSet`], [`DisabledTool`],
//!   [`WorkspaceToolsConfig`].
//! - [`fs`]: file and directory tools (`read_file`, `write_file`,
//!   `append_file`, `delete_file`, `list_files`, `list_dir`, `make_dir`,
//!   `delete_dir`).
//! - [`shell`]: `run_command` with a timeout and blocklist.
//! - [`search`]: `web_search` and the [`SearchProvider`] seam.
//! - [`spec`]: [`ToolSpec`](spec::ToolSpec) builder for structured
//!   descriptions.
//! - [`names`]: canonical tool name constants.
//!
//! The plan tools live in [`crate::plan`].

pub mod core;
pub mod fs;
pub mod names;
pub mod search;
pub mod shell;
pub mod spec;

pub use core::{
    DEFAULT_BLOCKED_COMMANDS, DEFAULT_COMMAND_TIMEOUT, DEFAULT_MAX_SEARCH_RESULTS, DisabledTool,
    Tool, ToolFuture, ToolSet, WorkspaceToolsConfig, parse_tool_args, truncate_result,
    validate_tool_arguments,
};
pub use search::{BraveSearch, SearchFuture, SearchHit, SearchProvider, WebSearch};
