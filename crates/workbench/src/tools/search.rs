//! Web search behind a pluggable provider.
//!
//! [`WebSearch`] is the tool; [`SearchProvider`] is the backend seam. The
//! production backend is [`BraveSearch`], which calls the Brave Search API
//! with the key from `BRAVE_SEARCH_KEY` (free tier: 2000 queries/month at
//! <https://brave.com/search/api/>).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::ToolDef;
use crate::error::{ToolError, render_result};
use crate::session::SessionContext;
use crate::tools::core::{DEFAULT_MAX_SEARCH_RESULTS, Tool, ToolFuture, parse_tool_args};
use crate::tools::names;
use crate::tools::spec::ToolSpec;

/// Env var holding the Brave Search subscription token.
pub const BRAVE_KEY_ENV: &str = "BRAVE_SEARCH_KEY";

const BRAVE_ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Boxed future returned by [`SearchProvider::search`].
pub type SearchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<SearchHit>, ToolError>> + Send + 'a>>;

/// A search backend.
pub trait SearchProvider: Send + Sync {
    /// Return at most `count` hits for `query`.
    fn search<'a>(&'a self, query: &'a str, count: usize) -> SearchFuture<'a>;
}

// ── BraveSearch ─────────────────────────────────────────────────────

pub struct BraveSearch {
    api_key: String,
    client: reqwest::Client,
}

impl BraveSearch {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ToolError::Execution(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_key: api_key.into(),
            client,
        })
    }

    /// Build from `BRAVE_SEARCH_KEY`. `None` when the key is unset or empty.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var(BRAVE_KEY_ENV).ok()?;
        if key.trim().is_empty() {
            return None;
        }
        match Self::new(key) {
            Ok(brave) => Some(brave),
            Err(e) => {
                warn!("Brave search unavailable: {e}");
                None
            }
        }
    }

    async fn query(&self, query: &str, count: usize) -> Result<Vec<SearchHit>, ToolError> {
        let url = format!("{BRAVE_ENDPOINT}?q={}&count={count}", urlencoded(query));
        let resp = self
            .client
            .get(&url)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ToolError::Execution(format!("HTTP {status}: {body}")));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e: reqwest::Error| ToolError::Execution(e.to_string()))?;
        Ok(parse_brave_hits(&body))
    }
}

impl SearchProvider for BraveSearch {
    fn search<'a>(&'a self, query: &'a str, count: usize) -> SearchFuture<'a> {
        Box::pin(self.query(query, count))
    }
}

/// Minimal percent-encoding for URL query parameters.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push_str(&format!("{b:02X}"));
            }
        }
    }
    out
}

/// Pull `web.results[*]` out of a Brave response body.
fn parse_brave_hits(body: &serde_json::Value) -> Vec<SearchHit> {
    let Some(results) = body["web"]["results"].as_array() else {
        return Vec::new();
    };
    results
        .iter()
        .map(|r| SearchHit {
            title: r["title"].as_str().unwrap_or("").to_string(),
            url: r["url"].as_str().unwrap_or("").to_string(),
            snippet: r["description"].as_str().unwrap_or("").to_string(),
        })
        .collect()
}

// ── WebSearch tool ──────────────────────────────────────────────────

/// Typed arguments for `web_search`.
#[derive(Deserialize, JsonSchema)]
pub struct WebSearchArgs {
    /// The search query (e.g. 'python curses snake game tutorial').
    pub query: String,
}

/// Search the web and return at most `max_results` formatted hits.
pub struct WebSearch {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl WebSearch {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            max_results: DEFAULT_MAX_SEARCH_RESULTS,
        }
    }

    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// The `web_search` definition, shared with the disabled stand-in
    /// registered when no provider is available.
    pub fn tool_def() -> ToolDef {
        ToolSpec::builder(names::WEB_SEARCH, "Search the web and return titles, URLs, and snippets")
            .when_to_use(
                "When you need current information, documentation, or facts you are unsure \
                 about. Use specific, targeted queries",
            )
            .when_not_to_use("When the answer is in local files. Use read_file instead")
            .parameters_for::<WebSearchArgs>()
            .example(
                "web_search(query='rust tokio timeout example')",
                "Up to five numbered results",
            )
            .output_format("Numbered results: title, URL, and snippet, separated by blank lines")
            .to_tool_def()
    }

    async fn run(&self, arguments: &str) -> Result<String, ToolError> {
        let args: WebSearchArgs = parse_tool_args(arguments)?;
        let mut hits = self
            .provider
            .search(&args.query, self.max_results)
            .await
            .map_err(|e| ToolError::Execution(format!("web search failed: {e}")))?;
        // Providers are asked for `max_results` but not trusted to honour it.
        hits.truncate(self.max_results);
        debug!("web_search '{}' returned {} hits", args.query, hits.len());

        if hits.is_empty() {
            return Ok(format!("No results found for '{}'", args.query));
        }
        Ok(format_hits(&hits))
    }
}

impl Tool for WebSearch {
    fn definition(&self) -> ToolDef {
        Self::tool_def()
    }

    fn execute<'a>(&'a self, _ctx: &'a SessionContext, arguments: &'a str) -> ToolFuture<'a> {
        Box::pin(async move { render_result(self.run(arguments).await) })
    }
}

fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            let mut entry = format!("{}. {}\n   {}", i + 1, hit.title, hit.url);
            if !hit.snippet.is_empty() {
                entry.push_str(&format!("\n   {}", hit.snippet));
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedHits(usize);

    impl SearchProvider for FixedHits {
        // Ignores `count` so the tool's own cap is what gets tested.
        fn search<'a>(&'a self, query: &'a str, _count: usize) -> SearchFuture<'a> {
            Box::pin(async move {
                Ok((1..=self.0)
                    .map(|i| SearchHit {
                        title: format!("{query} {i}"),
                        url: format!("https://example.com/{i}"),
                        snippet: format!("snippet {i}"),
                    })
                    .collect())
            })
        }
    }

    struct Failing;

    impl SearchProvider for Failing {
        fn search<'a>(&'a self, _query: &'a str, _count: usize) -> SearchFuture<'a> {
            Box::pin(async { Err(ToolError::Execution("connection refused".into())) })
        }
    }

    fn ctx() -> SessionContext {
        SessionContext::new("test")
    }

    #[tokio::test]
    async fn caps_results_at_five() {
        let tool = WebSearch::new(Arc::new(FixedHits(8)));
        let result = tool.execute(&ctx(), r#"{"query": "rust"}"#).await;
        let entries: Vec<&str> = result.split("\n\n").collect();
        assert_eq!(entries.len(), 5);
        assert!(entries[0].starts_with("1. rust 1\n   https://example.com/1\n   snippet 1"));
        assert!(entries[4].starts_with("5. "));
    }

    #[tokio::test]
    async fn empty_result_set_reports_no_results() {
        let tool = WebSearch::new(Arc::new(FixedHits(0)));
        let result = tool.execute(&ctx(), r#"{"query": "zzxq"}"#).await;
        assert_eq!(result, "No results found for 'zzxq'");
    }

    #[tokio::test]
    async fn provider_failure_becomes_error_text() {
        let tool = WebSearch::new(Arc::new(Failing));
        let result = tool.execute(&ctx(), r#"{"query": "anything"}"#).await;
        assert_eq!(result, "Error: web search failed: connection refused");
    }

    #[tokio::test]
    async fn missing_query_is_an_error() {
        let tool = WebSearch::new(Arc::new(FixedHits(1)));
        let result = tool.execute(&ctx(), "{}").await;
        assert!(result.starts_with("Error: invalid tool arguments"));
    }

    #[test]
    fn urlencoded_escapes_reserved_bytes() {
        assert_eq!(urlencoded("a b&c"), "a+b%26c");
        assert_eq!(urlencoded("safe-_.~"), "safe-_.~");
    }

    #[test]
    fn parses_brave_response_body() {
        let body = serde_json::json!({
            "web": { "results": [
                { "title": "Tokio", "url": "https://tokio.rs", "description": "Async runtime" },
                { "title": "No snippet", "url": "https://example.com" }
            ]}
        });
        let hits = parse_brave_hits(&body);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].snippet, "Async runtime");
        assert_eq!(format_hits(&hits[1..]), "1. No snippet\n   https://example.com");
    }

    #[test]
    fn missing_web_section_is_empty() {
        assert!(parse_brave_hits(&serde_json::json!({})).is_empty());
    }
}
