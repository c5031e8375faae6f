//! Line-oriented request loop over stdin.
//!
//! Each non-blank input line is a JSON [`ToolCall`]. Each answer is one JSON
//! line `{"name": ..., "result": ...}`. The words `exit`, `quit`, and `bye`
//! end the loop.

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use workbench::tools::ToolSet;
use workbench::{SessionContext, ToolCall};

const EXIT_WORDS: &[&str] = &["exit", "quit", "bye"];

#[derive(Debug, Serialize)]
pub struct Reply {
    pub name: String,
    pub result: String,
}

pub fn is_exit_command(line: &str) -> bool {
    let word = line.trim();
    EXIT_WORDS.iter().any(|w| w.eq_ignore_ascii_case(word))
}

/// Answer one request line. `None` for blank lines.
pub async fn handle_line(tools: &ToolSet, ctx: &SessionContext, line: &str) -> Option<Reply> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let reply = match serde_json::from_str::<ToolCall>(line) {
        Ok(call) => Reply {
            result: tools.dispatch(ctx, &call).await,
            name: call.name,
        },
        Err(e) => Reply {
            name: String::new(),
            result: format!(
                "Error: could not parse tool call: {e}. \
                 Expected {{\"name\": \"...\", \"arguments\": {{...}}}}"
            ),
        },
    };
    Some(reply)
}

/// Serve requests from `input` until EOF or an exit word.
pub async fn run<R, W>(
    tools: &ToolSet,
    ctx: &SessionContext,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Serving tool calls for {ctx}");
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if is_exit_command(&line) {
            debug!("Exit requested");
            break;
        }
        let Some(reply) = handle_line(tools, ctx, &line).await else {
            continue;
        };
        let mut encoded = serde_json::to_string(&reply).map_err(std::io::Error::other)?;
        encoded.push('\n');
        output.write_all(encoded.as_bytes()).await?;
        output.flush().await?;
    }
    info!("Session {} finished", ctx.session_id);
    Ok(())
}
