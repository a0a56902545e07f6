//! URL content tool definition.
//!
//! Fetching goes through the [`Fetcher`] trait so the tool can be driven by
//! a stub in tests; [`HttpFetcher`] is the production implementation on top
//! of a blocking `reqwest` client.

use std::io::Read;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use rmcp::handler::server::tool::cached_schema_for_type;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::core::config::ToolsConfig;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::schema::{Arguments, ParamSpec, ParamType, ToolDescriptor};

/// Upper bound on the number of body bytes read from a response.
pub const MAX_BODY_BYTES: u64 = 5 * 1024 * 1024;

/// Column width used when rendering HTML to text.
const HTML_TEXT_WIDTH: usize = 80;

/// A fetched HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub final_url: String,
}

/// Retrieves the raw contents of a URL.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<FetchedPage, ToolError>;
}

/// Blocking HTTP fetcher bounded by a request timeout.
///
/// A client is built per call. Do not call this from inside an async
/// runtime worker; the server runs tool calls on the blocking pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout: Duration,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            timeout,
            user_agent: user_agent.into(),
        }
    }

    fn describe_error(&self, url: &Url, err: &reqwest::Error) -> ToolError {
        if err.is_timeout() {
            ToolError::fetch(format!(
                "request to {} timed out after {}s",
                url,
                self.timeout.as_secs_f64()
            ))
        } else if err.is_connect() {
            ToolError::fetch(format!("could not connect to {}: {}", url, err))
        } else {
            ToolError::fetch(format!("request to {} failed: {}", url, err))
        }
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(skip(self), fields(url = %url))]
    fn fetch(&self, url: &Url) -> Result<FetchedPage, ToolError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| ToolError::fetch(format!("HTTP client error: {e}")))?;

        let response = client
            .get(url.clone())
            .send()
            .map_err(|e| self.describe_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::fetch(format!("{} returned HTTP {}", url, status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let final_url = response.url().to_string();

        let mut body = Vec::new();
        response
            .take(MAX_BODY_BYTES + 1)
            .read_to_end(&mut body)
            .map_err(|e| ToolError::fetch(format!("failed to read body of {}: {}", url, e)))?;
        if body.len() as u64 > MAX_BODY_BYTES {
            return Err(ToolError::fetch(format!(
                "response from {} exceeds {} bytes",
                url, MAX_BODY_BYTES
            )));
        }

        debug!("Fetched {} byte(s) with status {}", body.len(), status.as_u16());
        Ok(FetchedPage {
            status: status.as_u16(),
            content_type,
            body,
            final_url,
        })
    }
}

/// How a response body is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    PlainText,
}

/// Classify a `Content-Type` header value.
pub fn classify(content_type: Option<&str>) -> Result<ContentKind, ToolError> {
    let Some(raw) = content_type else {
        return Ok(ContentKind::PlainText);
    };
    let essence = raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

    match essence.as_str() {
        "" => Ok(ContentKind::PlainText),
        "text/html" | "application/xhtml+xml" => Ok(ContentKind::Html),
        "application/json" | "application/xml" | "application/javascript" => Ok(ContentKind::PlainText),
        e if e.starts_with("text/") || e.ends_with("+json") || e.ends_with("+xml") => {
            Ok(ContentKind::PlainText)
        }
        _ => Err(ToolError::unsupported_content_type(raw.trim())),
    }
}

/// Truncate `content` to `max_length` characters, appending `...` when cut.
pub fn truncate(content: &str, max_length: usize) -> (String, bool) {
    match content.char_indices().nth(max_length) {
        Some((cut, _)) => (format!("{}...", &content[..cut]), true),
        None => (content.to_string(), false),
    }
}

/// Structured output of a successful fetch.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct UrlOutput {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub content: String,
    pub truncated: bool,
}

/// URL tool - fetches a page and returns its text.
pub struct UrlTool {
    fetcher: Box<dyn Fetcher>,
}

impl UrlTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "url_tool";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetch an http(s) URL and return its text content. HTML is \
         converted to plain text; the result is truncated to max_length characters.";

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::with_fetcher(HttpFetcher::new(
            Duration::from_secs(config.fetch_timeout_secs),
            config.fetch_user_agent.clone(),
        ))
    }

    pub fn with_fetcher(fetcher: impl Fetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
        }
    }

    pub fn descriptor(config: &ToolsConfig) -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION)
            .param(ParamSpec::required("url", ParamType::String, "http or https URL to fetch"))
            .param(
                ParamSpec::optional("max_length", ParamType::Integer, "Maximum number of characters to return")
                    .with_default(config.fetch_max_length as u64),
            )
            .with_output_schema(cached_schema_for_type::<UrlOutput>())
    }

    /// Execute the tool logic.
    #[instrument(skip(self))]
    pub fn execute(&self, url: &str, max_length: i64) -> Result<UrlOutput, ToolError> {
        info!("URL tool called");

        let max_length = usize::try_from(max_length)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| ToolError::invalid_argument("max_length", "must be a positive integer"))?;

        let parsed = Url::parse(url.trim())
            .map_err(|e| ToolError::invalid_argument("url", format!("'{}' is not a valid URL: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ToolError::invalid_argument(
                "url",
                format!("scheme '{}' is not allowed (use http or https)", parsed.scheme()),
            ));
        }

        let page = self.fetcher.fetch(&parsed)?;
        let text = match classify(page.content_type.as_deref())? {
            ContentKind::Html => html2text::from_read(&page.body[..], HTML_TEXT_WIDTH)
                .map_err(|e| ToolError::handler(format!("html2text error: {e}")))?,
            ContentKind::PlainText => String::from_utf8_lossy(&page.body).into_owned(),
        };

        let (content, truncated) = truncate(text.trim(), max_length);
        if truncated {
            warn!("Content of {} truncated to {} characters", page.final_url, max_length);
        }

        Ok(UrlOutput {
            url: page.final_url,
            status: page.status,
            content_type: page.content_type,
            content,
            truncated,
        })
    }
}

impl ToolHandler for UrlTool {
    fn call(&self, args: &Arguments) -> Result<Value, ToolError> {
        let output = self.execute(args.str("url")?, args.i64("max_length")?)?;
        serde_json::to_value(output).map_err(|e| ToolError::handler(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ErrorKind;
    use std::sync::Mutex;
    use std::time::Instant;

    /// Serves a canned page and records requested URLs.
    struct StubFetcher {
        content_type: Option<&'static str>,
        body: &'static str,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn new(content_type: Option<&'static str>, body: &'static str) -> Self {
            Self {
                content_type,
                body,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl Fetcher for StubFetcher {
        fn fetch(&self, url: &Url) -> Result<FetchedPage, ToolError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(FetchedPage {
                status: 200,
                content_type: self.content_type.map(str::to_string),
                body: self.body.as_bytes().to_vec(),
                final_url: url.to_string(),
            })
        }
    }

    impl Fetcher for std::sync::Arc<StubFetcher> {
        fn fetch(&self, url: &Url) -> Result<FetchedPage, ToolError> {
            self.as_ref().fetch(url)
        }
    }

    #[test]
    fn test_html_is_converted_to_text() {
        let tool = UrlTool::with_fetcher(StubFetcher::new(
            Some("text/html; charset=utf-8"),
            "<html><body><h1>Title</h1><p>Hello <b>world</b></p></body></html>",
        ));
        let output = tool.execute("https://example.com/", 2000).unwrap();
        assert!(output.content.contains("Title"));
        assert!(output.content.contains("world"));
        assert!(!output.content.contains("<p>"));
        assert!(!output.truncated);
        assert_eq!(output.status, 200);
    }

    #[test]
    fn test_plain_and_json_pass_through() {
        let tool = UrlTool::with_fetcher(StubFetcher::new(Some("application/json"), "{\"a\":1}"));
        assert_eq!(tool.execute("http://example.com/a.json", 100).unwrap().content, "{\"a\":1}");

        let tool = UrlTool::with_fetcher(StubFetcher::new(None, "raw body"));
        assert_eq!(tool.execute("http://example.com/", 100).unwrap().content, "raw body");
    }

    #[test]
    fn test_truncation() {
        let tool = UrlTool::with_fetcher(StubFetcher::new(Some("text/plain"), "abcdefghij"));
        let output = tool.execute("http://example.com/", 4).unwrap();
        assert_eq!(output.content, "abcd...");
        assert!(output.truncated);

        let output = tool.execute("http://example.com/", 10).unwrap();
        assert_eq!(output.content, "abcdefghij");
        assert!(!output.truncated);
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("ééé", 2), ("éé...".to_string(), true));
        assert_eq!(truncate("", 1), (String::new(), false));
    }

    #[test]
    fn test_binary_content_is_rejected() {
        let tool = UrlTool::with_fetcher(StubFetcher::new(Some("image/png"), "\u{0089}PNG"));
        let err = tool.execute("https://example.com/logo.png", 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedContentType);
    }

    #[test]
    fn test_rejects_bad_urls_without_fetching() {
        let stub = std::sync::Arc::new(StubFetcher::new(Some("text/plain"), "x"));
        let tool = UrlTool::with_fetcher(stub.clone());

        for url in ["file:///etc/passwd", "ftp://example.com/", "not a url", ""] {
            let err = tool.execute(url, 100).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgumentError, "{url}");
        }
        let err = tool.execute("http://example.com/", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgumentError);

        assert!(stub.requested.lock().unwrap().is_empty());
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(Some("text/HTML")).unwrap(), ContentKind::Html);
        assert_eq!(classify(Some("text/csv")).unwrap(), ContentKind::PlainText);
        assert_eq!(classify(Some("application/ld+json")).unwrap(), ContentKind::PlainText);
        assert_eq!(classify(None).unwrap(), ContentKind::PlainText);
        assert!(classify(Some("application/octet-stream")).is_err());
    }

    #[test]
    fn test_unreachable_host_is_fetch_error() {
        let tool = UrlTool::with_fetcher(HttpFetcher::new(Duration::from_secs(2), "test-agent"));

        let start = Instant::now();
        let err = tool.execute("http://127.0.0.1:1/", 100).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FetchError);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_silent_server_times_out() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept the connection and never answer.
        std::thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                std::thread::sleep(Duration::from_secs(5));
                drop(stream);
            }
        });

        let tool = UrlTool::with_fetcher(HttpFetcher::new(Duration::from_secs(1), "test-agent"));
        let start = Instant::now();
        let err = tool.execute(&format!("http://{}/", addr), 100).unwrap_err();
        let elapsed = start.elapsed();

        assert_eq!(err.kind(), ErrorKind::FetchError);
        assert!(err.to_string().contains("timed out after 1s"), "{}", err);
        assert!(elapsed >= Duration::from_millis(900), "{:?}", elapsed);
        assert!(elapsed < Duration::from_secs(4), "{:?}", elapsed);
    }

    #[test]
    #[ignore = "requires network access"]
    fn test_fetch_live_page() {
        let tool = UrlTool::from_config(&ToolsConfig::default());
        let output = tool.execute("https://example.com/", 500).unwrap();
        assert!(output.content.contains("Example Domain"));
    }
}
