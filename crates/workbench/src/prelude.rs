//! Convenience re-exports for common `workbench` types.
//!
//! ```ignore
//! use workbench::prelude::*;
//! ```

pub use crate::{ToolCall, ToolDef, json_schema_for};

pub use crate::error::{ToolError, render_result};
pub use crate::session::SessionContext;
pub use crate::workspace::Workspace;

// ── Tools ───────────────────────────────────────────────────────────
pub use crate::tools::spec::ToolSpec;
pub use crate::tools::{
    DisabledTool, SearchHit, SearchProvider, Tool, ToolFuture, ToolSet, WorkspaceToolsConfig,
    parse_tool_args,
};

// ── Plans ───────────────────────────────────────────────────────────
pub use crate::plan::{PlanDocument, StepStatus};
