//! The on-disk checklist format.
//!
//! A step line is exactly `- [ ] ` or `- [x] ` followed by free text. Every
//! other line (the `# title` header, blank lines, notes an agent or human
//! added by hand) is kept verbatim and never counted toward step indices.
//! Rendering a parsed document reproduces the original bytes, so flipping a
//! marker changes nothing but that one character.

use std::fmt;
use std::str::FromStr;

use crate::error::ToolError;

const PENDING_PREFIX: &str = "- [ ] ";
const DONE_PREFIX: &str = "- [x] ";

/// Header title used when `create_plan` is not given one.
pub const DEFAULT_TITLE: &str = "Plan";

/// Completion state of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Done,
}

impl StepStatus {
    fn prefix(self) -> &'static str {
        match self {
            StepStatus::Pending => PENDING_PREFIX,
            StepStatus::Done => DONE_PREFIX,
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "pending"),
            StepStatus::Done => write!(f, "done"),
        }
    }
}

/// Accepts `done` / `pending`, ignoring case and surrounding whitespace.
impl FromStr for StepStatus {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "done" => Ok(StepStatus::Done),
            "pending" => Ok(StepStatus::Pending),
            _ => Err(ToolError::InvalidStatus(s.to_string())),
        }
    }
}

/// A step as seen by callers: position, state, and text without the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub index: usize,
    pub status: StepStatus,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// `rest` is everything after the marker, including any line ending.
    Step { status: StepStatus, rest: String },
    Text(String),
}

/// A parsed plan file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDocument {
    lines: Vec<Line>,
}

impl PlanDocument {
    /// Build a fresh document: a `# title` header, a blank line, then one
    /// pending step per non-blank line of `steps`.
    ///
    /// Line breaks in `title` collapse to single spaces; the header is always
    /// exactly one line.
    pub fn new(title: &str, steps: &str) -> Self {
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut lines = vec![
            Line::Text(format!("# {title}\n")),
            Line::Text("\n".to_string()),
        ];
        lines.extend(
            steps
                .lines()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Line::Step {
                    status: StepStatus::Pending,
                    rest: format!("{s}\n"),
                }),
        );
        Self { lines }
    }

    pub fn parse(text: &str) -> Self {
        let lines = text
            .split_inclusive('\n')
            .map(|line| {
                if let Some(rest) = line.strip_prefix(PENDING_PREFIX) {
                    Line::Step {
                        status: StepStatus::Pending,
                        rest: rest.to_string(),
                    }
                } else if let Some(rest) = line.strip_prefix(DONE_PREFIX) {
                    Line::Step {
                        status: StepStatus::Done,
                        rest: rest.to_string(),
                    }
                } else {
                    Line::Text(line.to_string())
                }
            })
            .collect();
        Self { lines }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Step { status, rest } => {
                    out.push_str(status.prefix());
                    out.push_str(rest);
                }
                Line::Text(text) => out.push_str(text),
            }
        }
        out
    }

    pub fn steps(&self) -> Vec<PlanStep> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                Line::Step { status, rest } => Some((*status, rest)),
                Line::Text(_) => None,
            })
            .enumerate()
            .map(|(index, (status, rest))| PlanStep {
                index,
                status,
                description: rest.trim_end_matches(['\n', '\r']).to_string(),
            })
            .collect()
    }

    /// Number of step lines.
    pub fn len(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, Line::Step { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set the marker of step `index`. Returns the previous status.
    ///
    /// On an out-of-range index the document is left untouched.
    pub fn set_status(&mut self, index: usize, new: StepStatus) -> Result<StepStatus, ToolError> {
        let len = self.len();
        let slot = self
            .lines
            .iter_mut()
            .filter_map(|line| match line {
                Line::Step { status, .. } => Some(status),
                Line::Text(_) => None,
            })
            .nth(index)
            .ok_or(ToolError::StepOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, new))
    }

    /// `(done, total)` step counts.
    pub fn progress(&self) -> (usize, usize) {
        let steps = self.steps();
        let done = steps
            .iter()
            .filter(|s| s.status == StepStatus::Done)
            .count();
        (done, steps.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_discards_blank_entries() {
        let doc = PlanDocument::new(DEFAULT_TITLE, "a\nb\n\nc");
        assert_eq!(doc.render(), "# Plan\n\n- [ ] a\n- [ ] b\n- [ ] c\n");
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn new_trims_entries_and_crlf() {
        let doc = PlanDocument::new("Snake", "  write tests  \r\n   \r\nship\r\n");
        let descriptions: Vec<String> = doc.steps().into_iter().map(|s| s.description).collect();
        assert_eq!(descriptions, ["write tests", "ship"]);
        assert!(doc.render().starts_with("# Snake\n"));
    }

    #[test]
    fn multi_line_title_stays_in_the_header() {
        let doc = PlanDocument::new("T\n- [ ] ghost\r\nmore", "a");
        assert_eq!(doc.render(), "# T - [ ] ghost more\n\n- [ ] a\n");
        assert_eq!(doc.len(), 1);
        assert_eq!(PlanDocument::parse(&doc.render()).len(), 1);
    }

    #[test]
    fn parse_render_preserves_bytes() {
        let text = "# Plan\n\nIntro paragraph\n- [ ] one\n  - [ ] indented is text\n\
                    - [x] two\n- [X] capital is text\n-[ ] no space is text\n\
                    - [ ] last without newline";
        let doc = PlanDocument::parse(text);
        assert_eq!(doc.render(), text);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn steps_are_indexed_among_markers_only() {
        let doc = PlanDocument::parse("# P\nnote\n- [ ] a\nmore notes\n- [x] b\n");
        let steps = doc.steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].index, 1);
        assert_eq!(steps[1].description, "b");
        assert_eq!(steps[1].status, StepStatus::Done);
    }

    #[test]
    fn set_status_changes_one_marker() {
        let mut doc = PlanDocument::new("P", "a\nb\nc");
        let previous = doc.set_status(1, StepStatus::Done).unwrap();
        assert_eq!(previous, StepStatus::Pending);
        assert_eq!(doc.render(), "# P\n\n- [ ] a\n- [x] b\n- [ ] c\n");
        assert_eq!(doc.progress(), (1, 3));
    }

    #[test]
    fn set_status_can_reopen_a_step() {
        let mut doc = PlanDocument::parse("- [x] a\n");
        doc.set_status(0, StepStatus::Pending).unwrap();
        assert_eq!(doc.render(), "- [ ] a\n");
    }

    #[test]
    fn set_status_out_of_range_leaves_document_alone() {
        let mut doc = PlanDocument::new("P", "a\nb\nc");
        let before = doc.clone();
        let err = doc.set_status(5, StepStatus::Done).unwrap_err();
        assert!(matches!(err, ToolError::StepOutOfRange { index: 5, len: 3 }));
        assert_eq!(doc, before);
    }

    #[test]
    fn status_parsing() {
        assert_eq!(" Done ".parse::<StepStatus>().unwrap(), StepStatus::Done);
        assert_eq!("PENDING".parse::<StepStatus>().unwrap(), StepStatus::Pending);
        assert!(matches!(
            "finished".parse::<StepStatus>(),
            Err(ToolError::InvalidStatus(_))
        ));
    }

    #[test]
    fn empty_document() {
        let doc = PlanDocument::parse("");
        assert!(doc.is_empty());
        assert_eq!(doc.progress(), (0, 0));
        assert_eq!(doc.render(), "");
    }
}
