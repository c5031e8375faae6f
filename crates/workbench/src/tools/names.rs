//! Canonical tool name constants.
//!
//! All tool-name string literals should reference these constants to avoid
//! scattered magic strings.

pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const APPEND_FILE: &str = "append_file";
pub const DELETE_FILE: &str = "delete_file";
pub const LIST_FILES: &str = "list_files";
pub const LIST_DIR: &str = "list_dir";
pub const MAKE_DIR: &str = "make_dir";
pub const DELETE_DIR: &str = "delete_dir";
pub const RUN_COMMAND: &str = "run_command";
pub const WEB_SEARCH: &str = "web_search";
pub const CREATE_PLAN: &str = "create_plan";
pub const UPDATE_PLAN: &str = "update_plan";

/// Every tool registered by
/// [`ToolSet::with_workspace_tools`](crate::tools::core::ToolSet::with_workspace_tools).
pub const ALL: &[&str] = &[
    READ_FILE,
    WRITE_FILE,
    APPEND_FILE,
    DELETE_FILE,
    LIST_FILES,
    LIST_DIR,
    MAKE_DIR,
    DELETE_DIR,
    RUN_COMMAND,
    WEB_SEARCH,
    CREATE_PLAN,
    UPDATE_PLAN,
];
