//! Command-line host for the `workbench` tools.
//!
//! The `workbench` binary plays the agent runtime's side of the contract
//! from a terminal or a pipe:
//!
//! ```sh
//! # Show every tool definition as JSON
//! workbench --list-tools
//!
//! # One call
//! workbench --workdir ./snake_game --call create_plan \
//!     --args '{"path": "plan.md", "steps": "scaffold\nloop\ntests"}'
//!
//! # JSON lines on stdin: {"name": "...", "arguments": {...}}
//! workbench --workdir ./snake_game
//! ```
//!
//! [`CliConfig`] turns the parsed flags into a [`ToolSet`](workbench::tools::ToolSet)
//! and a [`SessionContext`](workbench::SessionContext).

pub mod config;
pub mod repl;

pub use config::CliConfig;
