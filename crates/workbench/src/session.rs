//! Per-session identity passed explicitly into every tool call.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Who is calling, and which run the call belongs to.
///
/// Created once per agent session and borrowed by each
/// [`ToolSet::execute`](crate::tools::core::ToolSet::execute) call, where it
/// is attached to the tracing span of the invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: String,
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl SessionContext {
    /// Start a new session for `user_id` with a fresh random id.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    /// Override the generated session id (e.g. when resuming a known run).
    pub fn with_session_id(mut self, session_id: Uuid) -> Self {
        self.session_id = session_id;
        self
    }
}

impl fmt::Display for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user={} session={} started={}",
            self.user_id,
            self.session_id,
            self.started_at.to_rfc3339()
        )
    }
}
