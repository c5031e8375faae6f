//! Error taxonomy for tool operations.
//!
//! Operations return `Result<String, ToolError>` internally so they can use
//! `?`. At the tool boundary the error is rendered with [`render_result`]
//! into an `"Error: ..."` string, which is the only failure channel the
//! agent runtime sees.

use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong inside a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A referenced file or directory is absent.
    #[error("The {kind} '{path}' does not exist.")]
    NotFound { kind: &'static str, path: String },

    /// `update_plan` was pointed at a path with no plan document.
    #[error("Plan '{path}' not found.")]
    PlanNotFound { path: String },

    /// Directory creation target already present, as a directory or a file.
    #[error("The {kind} '{path}' already exists.")]
    AlreadyExists { kind: &'static str, path: String },

    /// Directory deletion blocked by contents.
    #[error("The directory '{path}' is not empty.")]
    NotEmpty { path: String },

    /// Arguments that are well-formed JSON but semantically unusable.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Step index {index} is out of range (the plan has {len} steps).")]
    StepOutOfRange { index: usize, len: usize },

    #[error("Unrecognized status '{0}'. Use 'done' or 'pending'.")]
    InvalidStatus(String),

    /// Absolute paths and `..` components never resolve.
    #[error("path traversal not allowed: '{path}'")]
    PathTraversal { path: String },

    #[error("potentially destructive command blocked")]
    Blocked,

    /// A command or search provider failed; the message is carried verbatim.
    #[error("{0}")]
    Execution(String),

    #[error("command timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    pub fn not_found(kind: &'static str, path: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            path: path.into(),
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The text returned to the agent for this error.
    pub fn to_result_text(&self) -> String {
        format!("Error: {self}")
    }
}

/// Collapse an operation outcome into the single string the runtime receives.
pub fn render_result(result: Result<String, ToolError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => e.to_result_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_mentions_does_not_exist() {
        let err = ToolError::not_found("file", "notes.txt");
        assert_eq!(
            err.to_result_text(),
            "Error: The file 'notes.txt' does not exist."
        );
    }

    #[test]
    fn render_passes_success_through() {
        assert_eq!(render_result(Ok("done".into())), "done");
    }

    #[test]
    fn render_prefixes_errors() {
        let text = render_result(Err(ToolError::NotEmpty { path: "src".into() }));
        assert!(text.starts_with("Error: "));
        assert!(text.contains("not empty"));
    }

    #[test]
    fn timeout_reports_seconds() {
        let err = ToolError::Timeout(Duration::from_secs(60));
        assert_eq!(err.to_string(), "command timed out after 60 seconds");
    }

    #[test]
    fn io_error_keeps_source() {
        let err = ToolError::io(
            "a/b.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("a/b.txt"));
    }
}
