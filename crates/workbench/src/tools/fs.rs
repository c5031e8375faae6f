//! Filesystem tools rooted at a [`Workspace`].
//!
//! | Tool | Name | Purpose |
//! |------|------|---------|
//! | [`ReadFile`] | `read_file` | Read a whole file |
//! | [`WriteFile`] | `write_file` | Create or overwrite a file |
//! | [`AppendFile`] | `append_file` | Append to a file |
//! | [`DeleteFile`] | `delete_file` | Delete a file |
//! | [`ListFiles`] | `list_files` | List the files (not directories) of one directory |
//! | [`ListDir`] | `list_dir` | List every entry of one directory |
//! | [`MakeDir`] | `make_dir` | Create a directory and missing parents |
//! | [`DeleteDir`] | `delete_dir` | Delete an empty directory |
//!
//! Each tool parses typed arguments, does its work through an inner
//! `Result<String, ToolError>` function, and renders the outcome at the
//! boundary. Directory removal is deliberately non-recursive.

use std::io::ErrorKind;
use std::path::Path;

use schemars::JsonSchema;
use serde::Deserialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::ToolDef;
use crate::error::{ToolError, render_result};
use crate::session::SessionContext;
use crate::tools::core::{Tool, ToolFuture, parse_tool_args};
use crate::tools::names;
use crate::tools::spec::ToolSpec;
use crate::workspace::Workspace;

// ── Typed argument structs ──────────────────────────────────────────

/// Typed arguments for tools that take a single path.
#[derive(Deserialize, JsonSchema)]
pub struct PathArgs {
    /// Path relative to the workspace root (e.g. 'snake_game/main.py').
    pub path: String,
}

/// Typed arguments for `write_file` and `append_file`.
#[derive(Deserialize, JsonSchema)]
pub struct ContentArgs {
    /// File path relative to the workspace root.
    pub path: String,
    /// Text to write.
    pub content: String,
}

/// Typed arguments for `list_files`.
#[derive(Deserialize, JsonSchema)]
pub struct ListFilesArgs {
    /// Directory relative to the workspace root. Defaults to the root itself.
    #[serde(default)]
    pub path: Option<String>,
}

// ── Shared helpers ──────────────────────────────────────────────────

async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

/// Names of the entries of `dir`, sorted. `files_only` skips everything that
/// is not a regular file.
async fn entry_names(dir: &Path, display: &str, files_only: bool) -> Result<String, ToolError> {
    if !is_dir(dir).await {
        return Err(ToolError::not_found("directory", display));
    }
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| ToolError::io(display, e))?;
    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ToolError::io(display, e))?
    {
        if files_only {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| ToolError::io(display, e))?;
            if !file_type.is_file() {
                continue;
            }
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names.join("\n"))
}

// ── ReadFile ────────────────────────────────────────────────────────

/// Read a file under the workspace and return its full contents.
pub struct ReadFile {
    workspace: Workspace,
}

impl ReadFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    async fn run(&self, arguments: &str) -> Result<String, ToolError> {
        let args: PathArgs = parse_tool_args(arguments)?;
        let full_path = self.workspace.resolve(&args.path)?;

        if !exists(&full_path).await {
            return Err(ToolError::not_found("file", args.path));
        }
        // A raw "Is a directory (os error 21)" gives the model nothing to act on.
        if is_dir(&full_path).await {
            return Err(ToolError::InvalidArgument(format!(
                "'{}' is a directory, not a file. Use list_dir to browse directories.",
                args.path
            )));
        }
        fs::read_to_string(&full_path)
            .await
            .map_err(|e| ToolError::io(args.path, e))
    }
}

impl Tool for ReadFile {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::READ_FILE, "Read the contents of a file")
            .when_to_use("When you need the text of a file whose path you already know")
            .when_not_to_use("When you need to see what files exist. Use list_files or list_dir")
            .parameters_for::<PathArgs>()
            .example("read_file(path='snake_game/plan.md')", "The full plan text")
            .output_format("Raw file content")
            .to_tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move { render_result(self.run(arguments).await) })
    }
}

// ── WriteFile ───────────────────────────────────────────────────────

/// Create or overwrite a file with the given content.
pub struct WriteFile {
    workspace: Workspace,
}

impl WriteFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    async fn run(&self, arguments: &str) -> Result<String, ToolError> {
        let args: ContentArgs = parse_tool_args(arguments)?;
        let full_path = self.workspace.resolve(&args.path)?;
        fs::write(&full_path, args.content.as_bytes())
            .await
            .map_err(|e| ToolError::io(&args.path, e))?;
        debug!("Wrote {} bytes to {}", args.content.len(), full_path.display());
        Ok(format!("Successfully wrote to {}", args.path))
    }
}

impl Tool for WriteFile {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::WRITE_FILE, "Write content to a file, replacing it")
            .when_to_use("When creating a new file or replacing a file's entire content")
            .when_not_to_use("When adding to the end of an existing file. Use append_file")
            .parameters_for::<ContentArgs>()
            .example(
                "write_file(path='hello.py', content='print(\"hi\")\\n')",
                "Successfully wrote to hello.py",
            )
            .output_format("Confirmation message")
            .to_tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move { render_result(self.run(arguments).await) })
    }
}

// ── AppendFile ──────────────────────────────────────────────────────

/// Append content to a file, creating the file (but not its parents) if absent.
pub struct AppendFile {
    workspace: Workspace,
}

impl AppendFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    async fn run(&self, arguments: &str) -> Result<String, ToolError> {
        let args: ContentArgs = parse_tool_args(arguments)?;
        let full_path = self.workspace.resolve(&args.path)?;
        let mut file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&full_path)
            .await
            .map_err(|e| ToolError::io(&args.path, e))?;
        file.write_all(args.content.as_bytes())
            .await
            .map_err(|e| ToolError::io(&args.path, e))?;
        file.flush()
            .await
            .map_err(|e| ToolError::io(&args.path, e))?;
        Ok(format!("Successfully appended to {}", args.path))
    }
}

impl Tool for AppendFile {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::APPEND_FILE, "Append content to the end of a file")
            .when_to_use("When adding lines to a log, notes file, or partially written file")
            .when_not_to_use("When replacing a file. Use write_file")
            .parameters_for::<ContentArgs>()
            .output_format("Confirmation message. No separator is inserted between appends")
            .to_tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move { render_result(self.run(arguments).await) })
    }
}

// ── DeleteFile ──────────────────────────────────────────────────────

/// Delete a single file.
pub struct DeleteFile {
    workspace: Workspace,
}

impl DeleteFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    async fn run(&self, arguments: &str) -> Result<String, ToolError> {
        let args: PathArgs = parse_tool_args(arguments)?;
        let full_path = self.workspace.resolve(&args.path)?;
        if !exists(&full_path).await {
            return Err(ToolError::not_found("file", args.path));
        }
        if is_dir(&full_path).await {
            return Err(ToolError::InvalidArgument(format!(
                "'{}' is a directory. Use delete_dir to remove directories.",
                args.path
            )));
        }
        fs::remove_file(&full_path)
            .await
            .map_err(|e| ToolError::io(&args.path, e))?;
        Ok(format!("Successfully deleted {}", args.path))
    }
}

impl Tool for DeleteFile {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::DELETE_FILE, "Delete a file")
            .when_to_use("When a file is no longer needed, including finished plan documents")
            .when_not_to_use("When removing a directory. Use delete_dir")
            .parameters_for::<PathArgs>()
            .output_format("Confirmation message")
            .to_tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move { render_result(self.run(arguments).await) })
    }
}

// ── ListFiles ───────────────────────────────────────────────────────

/// List the regular files of one directory (default: the workspace root).
pub struct ListFiles {
    workspace: Workspace,
}

impl ListFiles {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    async fn run(&self, arguments: &str) -> Result<String, ToolError> {
        let args: ListFilesArgs = parse_tool_args(arguments)?;
        let rel = args.path.as_deref().unwrap_or(".");
        let full_path = self.workspace.resolve(rel)?;
        entry_names(&full_path, rel, true).await
    }
}

impl Tool for ListFiles {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::LIST_FILES, "List the files in a directory")
            .when_to_use("When you need the files of the project root or one directory")
            .when_not_to_use("When you also need subdirectories. Use list_dir")
            .parameters_for::<ListFilesArgs>()
            .example("list_files()", "One file name per line from the workspace root")
            .output_format("One file name per line, sorted. Directories are omitted")
            .to_tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move { render_result(self.run(arguments).await) })
    }
}

// ── ListDir ─────────────────────────────────────────────────────────

/// List every entry (files and directories) of one directory.
pub struct ListDir {
    workspace: Workspace,
}

impl ListDir {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    async fn run(&self, arguments: &str) -> Result<String, ToolError> {
        let args: PathArgs = parse_tool_args(arguments)?;
        let full_path = self.workspace.resolve(&args.path)?;
        entry_names(&full_path, &args.path, false).await
    }
}

impl Tool for ListDir {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::LIST_DIR, "List every entry of a directory")
            .when_to_use("When you need to see both files and subdirectories")
            .when_not_to_use("When you only care about files. Use list_files")
            .parameters_for::<PathArgs>()
            .output_format("One entry name per line, sorted")
            .to_tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move { render_result(self.run(arguments).await) })
    }
}

// ── MakeDir ─────────────────────────────────────────────────────────

/// Create a directory, including any missing parents.
pub struct MakeDir {
    workspace: Workspace,
}

impl MakeDir {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    async fn run(&self, arguments: &str) -> Result<String, ToolError> {
        let args: PathArgs = parse_tool_args(arguments)?;
        let full_path = self.workspace.resolve(&args.path)?;
        if exists(&full_path).await {
            let kind = if is_dir(&full_path).await { "directory" } else { "file" };
            return Err(ToolError::AlreadyExists {
                kind,
                path: args.path,
            });
        }
        fs::create_dir_all(&full_path)
            .await
            .map_err(|e| ToolError::io(&args.path, e))?;
        Ok(format!("Successfully created directory {}", args.path))
    }
}

impl Tool for MakeDir {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::MAKE_DIR, "Create a directory")
            .when_to_use(
                "When starting a new project or grouping files. Missing parents are created",
            )
            .when_not_to_use("When creating a file. write_file creates files directly")
            .parameters_for::<PathArgs>()
            .example(
                "make_dir(path='snake_game/assets')",
                "Successfully created directory snake_game/assets",
            )
            .output_format("Confirmation message")
            .to_tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move { render_result(self.run(arguments).await) })
    }
}

// ── DeleteDir ───────────────────────────────────────────────────────

/// Delete an empty directory. Non-empty directories are refused.
pub struct DeleteDir {
    workspace: Workspace,
}

impl DeleteDir {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    async fn run(&self, arguments: &str) -> Result<String, ToolError> {
        let args: PathArgs = parse_tool_args(arguments)?;
        let full_path = self.workspace.resolve(&args.path)?;
        if !is_dir(&full_path).await {
            return Err(ToolError::not_found("directory", args.path));
        }
        match fs::remove_dir(&full_path).await {
            Ok(()) => Ok(format!("Successfully deleted directory {}", args.path)),
            Err(e) if e.kind() == ErrorKind::DirectoryNotEmpty => {
                Err(ToolError::NotEmpty { path: args.path })
            }
            Err(e) => Err(ToolError::io(args.path, e)),
        }
    }
}

impl Tool for DeleteDir {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::DELETE_DIR, "Delete an empty directory")
            .when_to_use("When a directory has already been emptied")
            .when_not_to_use(
                "When the directory still has files. Delete them first with delete_file",
            )
            .parameters_for::<PathArgs>()
            .output_format("Confirmation message")
            .to_tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move { render_result(self.run(arguments).await) })
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SessionContext {
        SessionContext::new("test")
    }

    fn workspace(dir: &tempfile::TempDir) -> Workspace {
        Workspace::new(dir.path())
    }

    // ── read / write / append ───────────────────────────────────

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(&dir);
        let written = WriteFile::new(ws.clone())
            .execute(&ctx(), r#"{"path": "a.txt", "content": "line 1\nline 2\n"}"#)
            .await;
        assert_eq!(written, "Successfully wrote to a.txt");

        let read = ReadFile::new(ws)
            .execute(&ctx(), r#"{"path": "a.txt"}"#)
            .await;
        assert_eq!(read, "line 1\nline 2\n");
    }

    #[tokio::test]
    async fn write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "old content").unwrap();
        WriteFile::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "a.txt", "content": "new"}"#)
            .await;
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "new");
    }

    #[tokio::test]
    async fn read_missing_file_does_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReadFile::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "missing.txt"}"#)
            .await;
        assert_eq!(result, "Error: The file 'missing.txt' does not exist.");
    }

    #[tokio::test]
    async fn read_directory_returns_hint() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();
        let result = ReadFile::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "subdir"}"#)
            .await;
        assert!(result.contains("is a directory, not a file"), "got: {result}");
        assert!(result.contains("list_dir"));
    }

    #[tokio::test]
    async fn append_concatenates_without_separator() {
        let dir = tempfile::tempdir().unwrap();
        let tool = AppendFile::new(workspace(&dir));
        tool.execute(&ctx(), r#"{"path": "log.txt", "content": "ab"}"#)
            .await;
        let second = tool
            .execute(&ctx(), r#"{"path": "log.txt", "content": "cd"}"#)
            .await;
        assert_eq!(second, "Successfully appended to log.txt");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("log.txt")).unwrap(),
            "abcd"
        );
    }

    #[tokio::test]
    async fn append_into_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppendFile::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "nope/log.txt", "content": "x"}"#)
            .await;
        assert!(result.starts_with("Error: I/O error on 'nope/log.txt'"), "got: {result}");
    }

    // ── delete ──────────────────────────────────────────────────

    #[tokio::test]
    async fn delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gone.txt"), "x").unwrap();
        let result = DeleteFile::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "gone.txt"}"#)
            .await;
        assert_eq!(result, "Successfully deleted gone.txt");
        assert!(!dir.path().join("gone.txt").exists());
    }

    #[tokio::test]
    async fn delete_missing_file_does_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = DeleteFile::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "ghost.txt"}"#)
            .await;
        assert!(result.contains("does not exist"));
    }

    // ── listing ─────────────────────────────────────────────────

    #[tokio::test]
    async fn list_files_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let result = ListFiles::new(workspace(&dir)).execute(&ctx(), "{}").await;
        assert_eq!(result, "a.txt\nb.txt");
    }

    #[tokio::test]
    async fn list_files_in_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/inner.rs"), "").unwrap();

        let result = ListFiles::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "sub"}"#)
            .await;
        assert_eq!(result, "inner.rs");
    }

    #[tokio::test]
    async fn list_dir_includes_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("file.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let result = ListDir::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "."}"#)
            .await;
        assert_eq!(result, "file.txt\nnested");
    }

    #[tokio::test]
    async fn list_dir_missing_does_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = ListDir::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "nowhere"}"#)
            .await;
        assert_eq!(result, "Error: The directory 'nowhere' does not exist.");
    }

    #[tokio::test]
    async fn list_files_missing_does_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = ListFiles::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "nowhere"}"#)
            .await;
        assert_eq!(result, "Error: The directory 'nowhere' does not exist.");
    }

    // ── make_dir / delete_dir ───────────────────────────────────

    #[tokio::test]
    async fn make_dir_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let result = MakeDir::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "a/b/c"}"#)
            .await;
        assert_eq!(result, "Successfully created directory a/b/c");
        assert!(dir.path().join("a/b/c").is_dir());
    }

    #[tokio::test]
    async fn make_dir_twice_already_exists() {
        let dir = tempfile::tempdir().unwrap();
        let tool = MakeDir::new(workspace(&dir));
        tool.execute(&ctx(), r#"{"path": "proj"}"#).await;
        std::fs::write(dir.path().join("proj/keep.txt"), "x").unwrap();

        let second = tool.execute(&ctx(), r#"{"path": "proj"}"#).await;
        assert!(second.contains("already exists"), "got: {second}");
        assert!(dir.path().join("proj/keep.txt").exists());
    }

    #[tokio::test]
    async fn make_dir_over_a_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f"), "data").unwrap();
        let result = MakeDir::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "f"}"#)
            .await;
        assert_eq!(result, "Error: The file 'f' already exists.");
        assert_eq!(std::fs::read_to_string(dir.path().join("f")).unwrap(), "data");
    }

    #[tokio::test]
    async fn delete_dir_removes_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();
        let result = DeleteDir::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "empty"}"#)
            .await;
        assert_eq!(result, "Successfully deleted directory empty");
        assert!(!dir.path().join("empty").exists());
    }

    #[tokio::test]
    async fn delete_dir_refuses_non_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("full")).unwrap();
        std::fs::write(dir.path().join("full/file.txt"), "x").unwrap();

        let result = DeleteDir::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "full"}"#)
            .await;
        assert_eq!(result, "Error: The directory 'full' is not empty.");
        assert!(dir.path().join("full/file.txt").exists());
    }

    #[tokio::test]
    async fn delete_dir_missing_does_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = DeleteDir::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "missing"}"#)
            .await;
        assert!(result.contains("does not exist"));
    }

    // ── argument handling ───────────────────────────────────────

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReadFile::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "../../etc/passwd"}"#)
            .await;
        assert_eq!(result, "Error: path traversal not allowed: '../../etc/passwd'");
    }

    #[tokio::test]
    async fn missing_arguments_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = WriteFile::new(workspace(&dir))
            .execute(&ctx(), r#"{"path": "x.txt"}"#)
            .await;
        assert!(result.starts_with("Error: invalid tool arguments"), "got: {result}");
    }

    #[test]
    fn content_args_schema_requires_both_fields() {
        let schema = crate::json_schema_for::<ContentArgs>();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("path")));
        assert!(required.contains(&serde_json::json!("content")));
    }

    #[test]
    fn list_files_path_is_optional() {
        let schema = crate::json_schema_for::<ListFilesArgs>();
        assert!(schema.get("required").is_none_or(|r| r.as_array().unwrap().is_empty()));
    }
}
