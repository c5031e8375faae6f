//! Filesystem, shell, and plan-tracking tools for LLM function-calling agents.
//!
//! `workbench` exposes a fixed set of named operations that an external agent
//! runtime can invoke by name with JSON arguments. Every operation resolves
//! its paths against a single [`Workspace`] root and answers with exactly one
//! text string: success output or an `Error: ...` description. Nothing is
//! ever raised past the tool boundary.
//!
//! # Getting started
//!
//! ```ignore
//! use workbench::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let workspace = Workspace::new("/path/to/project");
//!     let tools = ToolSet::new()
//!         .with_arg_validation(true)
//!         .with_workspace_tools(workspace, WorkspaceToolsConfig::default());
//!
//!     let session = SessionContext::new("1");
//!     let result = tools
//!         .execute(&session, "create_plan", r#"{"path": "plan.md", "steps": "scaffold\ntest"}"#)
//!         .await;
//!     println!("{result}");
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tools`] | [`Tool`](tools::core::Tool) trait, [`ToolSet`](tools::core::ToolSet) registry, filesystem, shell, and web search tools |
//! | [`plan`] | [`PlanDocument`](plan::PlanDocument) checklist format and the `create_plan` / `update_plan` tools |
//! | [`workspace`] | [`Workspace`] root and relative path resolution |
//! | [`session`] | [`SessionContext`] threaded through every call |
//! | [`error`] | [`ToolError`] taxonomy rendered into result text |

pub mod error;
pub mod plan;
pub mod prelude;
pub mod session;
pub mod tools;
pub mod workspace;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use error::ToolError;
pub use session::SessionContext;
pub use workspace::Workspace;

// Re-export schemars for downstream crates.
pub use schemars;

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`. Tool parameter schemas are always derived from the
/// same struct the arguments deserialize into, so the two cannot drift.
///
/// # Example
///
/// ```
/// use workbench::json_schema_for;
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct MakeDirArgs {
///     path: String,
///     #[serde(default)]
///     note: Option<String>,
/// }
///
/// let schema = json_schema_for::<MakeDirArgs>();
/// assert_eq!(schema["type"], "object");
/// assert!(schema["required"].as_array().unwrap().contains(&"path".into()));
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Tool types ─────────────────────────────────────────────────────

/// The type of a tool definition. Currently always `Function`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ToolType {
    #[serde(rename = "function")]
    Function,
}

/// Tool definition handed to the agent runtime (OpenAI function-calling format).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ToolDef {
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub function: FunctionDef,
}

impl ToolDef {
    /// Create a function-calling tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: ToolType::Function,
            function: FunctionDef {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A single tool invocation requested by the agent runtime.
///
/// Exists only for the duration of one call and is never persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ToolCall {
    pub name: String,
    #[serde(default = "empty_arguments")]
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

fn empty_arguments() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
