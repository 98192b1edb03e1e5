//! HTTP fetcher implementation
//!
//! This module handles all direct HTTP requests for the crawler, including:
//! - Building the shared HTTP client with identification headers
//! - Single-attempt GET requests for pages
//! - Content-Type checks
//! - Error classification into page outcomes

use crate::config::UserAgentConfig;
use crate::record::ResponseHeaders;
use crate::state::PageState;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

/// Accept header sent with every request
pub const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Accept-Language header sent with every request
pub const ACCEPT_LANGUAGE_VALUE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
    /// Response headers kept for the record
    pub response_headers: ResponseHeaders,
    /// X-Robots-Tag header, if sent
    pub x_robots_tag: Option<String>,
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success(FetchedPage),

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// The page state this error maps to
        state: PageState,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
        /// The page state this error maps to
        state: PageState,
    },
}

impl FetchResult {
    /// The page outcome this result maps to
    pub fn state(&self) -> PageState {
        match self {
            Self::Success(_) => PageState::Processed,
            Self::ContentMismatch { .. } => PageState::ContentMismatch,
            Self::HttpError { state, .. } | Self::NetworkError { state, .. } => *state,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Every request carries the configured `User-Agent` plus fixed `Accept` and
/// `Accept-Language` headers. Redirects are followed by the client.
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total timeout for a single request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use geo_readiness::config::UserAgentConfig;
/// use geo_readiness::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "GeoAudit".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

    Client::builder()
        .user_agent(config.header_value())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true for HTML-family content types
pub fn is_html_content_type(content_type: &str) -> bool {
    let lowered = content_type.to_ascii_lowercase();
    lowered.contains("text/html") || lowered.contains("application/xhtml")
}

fn header_string(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Fetches a page with a single GET attempt
///
/// # Outcome Mapping
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with HTML Content-Type | Success |
/// | 2xx with other Content-Type | ContentMismatch |
/// | HTTP 404 / 410 | HttpError → DeadLink |
/// | Other non-2xx | HttpError → HttpError |
/// | Timeout / connection failure | NetworkError → Unreachable |
/// | Body read or other failure | NetworkError → Failed |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
            state: PageState::from_http_status(status.as_u16()),
        };
    }

    let content_type = header_string(&response, "content-type").unwrap_or_default();
    if !is_html_content_type(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    let final_url = response.url().clone();
    let response_headers = ResponseHeaders {
        last_modified: header_string(&response, "last-modified"),
        cache_control: header_string(&response, "cache-control"),
        content_type: Some(content_type),
        x_frame_options: header_string(&response, "x-frame-options"),
    };
    let x_robots_tag = header_string(&response, "x-robots-tag");

    match response.text().await {
        Ok(body) => FetchResult::Success(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body,
            response_headers,
            x_robots_tag,
        }),
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            state: PageState::Unreachable,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            state: PageState::Unreachable,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            state: PageState::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    fn client() -> Client {
        build_http_client(&create_test_config(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_config(), Duration::from_secs(15));
        assert!(client.is_ok());
    }

    #[test]
    fn test_is_html_content_type() {
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(is_html_content_type("TEXT/HTML"));
        assert!(!is_html_content_type("application/pdf"));
        assert!(!is_html_content_type(""));
    }

    #[tokio::test]
    async fn test_fetch_success_sends_identification() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header(
                "user-agent",
                "TestCrawler/1.0 (+https://example.com/about; admin@example.com)",
            ))
            .and(header("accept", ACCEPT_VALUE))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("cache-control", "max-age=60")
                    .insert_header("x-robots-tag", "noarchive")
                    .set_body_raw("<html><title>Hi</title></html>", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        match fetch_page(&client(), &url).await {
            FetchResult::Success(page) => {
                assert_eq!(page.status_code, 200);
                assert!(page.body.contains("<title>Hi</title>"));
                assert_eq!(page.response_headers.cache_control.as_deref(), Some("max-age=60"));
                assert_eq!(page.x_robots_tag.as_deref(), Some("noarchive"));
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_non_html_is_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file.pdf"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(vec![0u8; 16], "application/pdf"),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/file.pdf", server.uri())).unwrap();
        let result = fetch_page(&client(), &url).await;
        assert_eq!(result.state(), PageState::ContentMismatch);
    }

    #[tokio::test]
    async fn test_fetch_404_is_dead_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let result = fetch_page(&client(), &url).await;
        assert!(matches!(
            result,
            FetchResult::HttpError {
                status_code: 404,
                state: PageState::DeadLink
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_500_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/busy", server.uri())).unwrap();
        let result = fetch_page(&client(), &url).await;
        assert_eq!(result.state(), PageState::HttpError);
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = build_http_client(&create_test_config(), Duration::from_millis(300)).unwrap();
        let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();
        let result = fetch_page(&client, &url).await;
        assert_eq!(result.state(), PageState::Unreachable);
    }
}
