//! Durable plan checklists.
//!
//! A plan is a markdown file in the workspace, created by [`create_plan`]
//! and advanced one step at a time by [`update_step`]. Steps are addressed
//! by their 0-based position among marker lines; see [`document`] for the
//! format. The tools [`CreatePlan`] (`create_plan`) and [`UpdatePlan`]
//! (`update_plan`) wrap the two operations for the [`ToolSet`](crate::tools::ToolSet).
//!
//! There is no plan-specific delete. Finished plans are removed with
//! `delete_file`.

pub mod document;

pub use document::{DEFAULT_TITLE, PlanDocument, PlanStep, StepStatus};

use schemars::JsonSchema;
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info};

use crate::ToolDef;
use crate::error::{ToolError, render_result};
use crate::session::SessionContext;
use crate::tools::core::{Tool, ToolFuture, parse_tool_args};
use crate::tools::names;
use crate::tools::spec::ToolSpec;
use crate::workspace::Workspace;

// ── Operations ──────────────────────────────────────────────────────

/// Write a fresh plan at `path`, replacing any existing file.
///
/// Blank entries in `steps` are dropped; at least one must remain. The title
/// must be a single line. Missing parent directories are created.
pub async fn create_plan(
    workspace: &Workspace,
    path: &str,
    steps: &str,
    title: Option<&str>,
) -> Result<String, ToolError> {
    let full_path = workspace.resolve(path)?;
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);
    if title.contains(['\n', '\r']) {
        return Err(ToolError::InvalidArgument(
            "A plan title must be a single line.".into(),
        ));
    }
    let doc = PlanDocument::new(title, steps);
    if doc.is_empty() {
        return Err(ToolError::InvalidArgument(
            "A plan needs at least one non-blank step.".into(),
        ));
    }

    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ToolError::io(path, e))?;
    }
    fs::write(&full_path, doc.render())
        .await
        .map_err(|e| ToolError::io(path, e))?;

    info!("Created plan {path} with {} steps", doc.len());
    Ok(format!("Created plan '{path}' with {} steps.", doc.len()))
}

/// Set step `index` of the plan at `path` to `status` (`done` or `pending`).
///
/// Every failure leaves the file byte-for-byte unchanged. Re-applying the
/// current status succeeds without rewriting the file.
pub async fn update_step(
    workspace: &Workspace,
    path: &str,
    index: usize,
    status: &str,
) -> Result<String, ToolError> {
    let full_path = workspace.resolve(path)?;
    if !fs::try_exists(&full_path).await.unwrap_or(false) {
        return Err(ToolError::PlanNotFound {
            path: path.to_string(),
        });
    }
    let status: StepStatus = status.parse()?;

    let text = fs::read_to_string(&full_path)
        .await
        .map_err(|e| ToolError::io(path, e))?;
    let mut doc = PlanDocument::parse(&text);
    let previous = doc.set_status(index, status)?;

    if previous == status {
        debug!("Plan {path} step {index} already {status}");
    } else {
        fs::write(&full_path, doc.render())
            .await
            .map_err(|e| ToolError::io(path, e))?;
        info!("Plan {path} step {index}: {previous} -> {status}");
    }

    let steps = doc.steps();
    let description = steps
        .get(index)
        .map(|s| s.description.as_str())
        .unwrap_or_default();
    let (done, total) = doc.progress();
    Ok(format!(
        "Step {index} marked {status}: {description} ({done}/{total} done)"
    ))
}

// ── Tools ───────────────────────────────────────────────────────────

/// Typed arguments for `create_plan`.
#[derive(Deserialize, JsonSchema)]
pub struct CreatePlanArgs {
    /// Plan file path relative to the workspace root (e.g. 'plan.md').
    pub path: String,
    /// Newline-separated step descriptions. Blank lines are ignored.
    pub steps: String,
    /// Optional header title. Defaults to 'Plan'.
    #[serde(default)]
    pub title: Option<String>,
}

/// Typed arguments for `update_plan`.
#[derive(Deserialize, JsonSchema)]
pub struct UpdatePlanArgs {
    /// Plan file path relative to the workspace root.
    pub path: String,
    /// 0-based index of the step among the plan's checklist lines.
    pub index: usize,
    /// 'done' or 'pending'.
    pub status: String,
}

pub struct CreatePlan {
    workspace: Workspace,
}

impl CreatePlan {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

impl Tool for CreatePlan {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::CREATE_PLAN, "Create a checklist plan file from a list of steps")
            .when_to_use(
                "At the start of a multi-step task, to record the steps you intend to take",
            )
            .when_not_to_use(
                "When a plan already exists and you only finished a step. Use update_plan",
            )
            .parameters_for::<CreatePlanArgs>()
            .example(
                "create_plan(path='plan.md', \
                 steps='scaffold project\\nwrite game loop\\nadd tests')",
                "Created plan 'plan.md' with 3 steps.",
            )
            .output_format("Confirmation with the step count. An existing file is overwritten")
            .to_tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move {
            let result = match parse_tool_args::<CreatePlanArgs>(arguments) {
                Ok(args) => {
                    create_plan(
                        &self.workspace,
                        &args.path,
                        &args.steps,
                        args.title.as_deref(),
                    )
                    .await
                }
                Err(e) => Err(e),
            };
            render_result(result)
        })
    }
}

pub struct UpdatePlan {
    workspace: Workspace,
}

impl UpdatePlan {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

impl Tool for UpdatePlan {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::UPDATE_PLAN, "Mark one step of a plan as done or pending")
            .when_to_use("After finishing a step, or to reopen a step that needs more work")
            .when_not_to_use("When starting a new plan. Use create_plan")
            .parameters_for::<UpdatePlanArgs>()
            .example(
                "update_plan(path='plan.md', index=0, status='done')",
                "Step 0 marked done: scaffold project (1/3 done)",
            )
            .output_format("Confirmation naming the step and overall progress")
            .to_tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move {
            let result = match parse_tool_args::<UpdatePlanArgs>(arguments) {
                Ok(args) => {
                    update_step(&self.workspace, &args.path, args.index, &args.status).await
                }
                Err(e) => Err(e),
            };
            render_result(result)
        })
    }
}
