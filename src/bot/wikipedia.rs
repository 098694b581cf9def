//! Wikipedia REST summary API client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const SUMMARY_API_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

/// A page summary as the router consumes it.
#[derive(Debug, Clone)]
pub struct PageSummary {
    pub title: String,
    /// Plain-text summary body. Empty when the page has no extract.
    pub extract: String,
    /// True when the query matched a disambiguation page rather than one article.
    pub is_disambiguation: bool,
    /// Canonical desktop URL of the page.
    pub url: String,
}

#[derive(Debug)]
pub enum FetchError {
    /// Wikipedia answered with a non-success status (no such page).
    NotFound,
    /// The request never produced a usable response (transport or parse failure).
    Unavailable(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "page not found"),
            Self::Unavailable(e) => write!(f, "wikipedia unavailable: {e}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Summary lookup seam, mocked in router tests.
#[async_trait]
pub trait SummaryFetch {
    async fn fetch_summary(&self, query: &str) -> Result<PageSummary, FetchError>;
}

#[derive(Deserialize)]
struct SummaryResponse {
    /// Record type marker; "disambiguation" means the query is ambiguous.
    #[serde(rename = "type")]
    kind: Option<String>,
    title: String,
    extract: Option<String>,
    content_urls: ContentUrls,
}

#[derive(Deserialize)]
struct ContentUrls {
    desktop: DesktopUrls,
}

#[derive(Deserialize)]
struct DesktopUrls {
    page: String,
}

impl From<SummaryResponse> for PageSummary {
    fn from(raw: SummaryResponse) -> Self {
        Self {
            title: raw.title,
            extract: raw.extract.unwrap_or_default(),
            is_disambiguation: raw.kind.as_deref() == Some("disambiguation"),
            url: raw.content_urls.desktop.page,
        }
    }
}

fn summary_url(query: &str) -> String {
    format!("{SUMMARY_API_URL}/{}", urlencoding::encode(query))
}

pub struct WikipediaClient {
    http: reqwest::Client,
}

impl WikipediaClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("wikibrief/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self { http }
    }
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummaryFetch for WikipediaClient {
    /// One GET against the summary endpoint, single attempt, no retry.
    async fn fetch_summary(&self, query: &str) -> Result<PageSummary, FetchError> {
        let url = summary_url(query);
        debug!("Fetching summary: {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(format!("HTTP error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            debug!("Wikipedia returned {status} for {query:?}");
            return Err(FetchError::NotFound);
        }

        let raw: SummaryResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Unavailable(format!("Parse error: {e}")))?;

        Ok(raw.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_url_encodes_spaces() {
        assert_eq!(
            summary_url("Albert Einstein"),
            "https://en.wikipedia.org/api/rest_v1/page/summary/Albert%20Einstein"
        );
    }

    #[test]
    fn test_summary_url_encodes_reserved_characters() {
        assert_eq!(
            summary_url("C++"),
            "https://en.wikipedia.org/api/rest_v1/page/summary/C%2B%2B"
        );
        assert_eq!(
            summary_url("Python (disambiguation)"),
            "https://en.wikipedia.org/api/rest_v1/page/summary/Python%20%28disambiguation%29"
        );
    }

    #[test]
    fn test_parses_standard_record() {
        let raw: SummaryResponse = serde_json::from_str(
            r#"{
                "type": "standard",
                "title": "Albert Einstein",
                "extract": "German physicist...",
                "content_urls": {
                    "desktop": { "page": "https://en.wikipedia.org/wiki/Albert_Einstein" }
                }
            }"#,
        )
        .unwrap();
        let summary = PageSummary::from(raw);

        assert_eq!(summary.title, "Albert Einstein");
        assert_eq!(summary.extract, "German physicist...");
        assert!(!summary.is_disambiguation);
        assert_eq!(summary.url, "https://en.wikipedia.org/wiki/Albert_Einstein");
    }

    #[test]
    fn test_flags_disambiguation_record() {
        let raw: SummaryResponse = serde_json::from_str(
            r#"{
                "type": "disambiguation",
                "title": "Python",
                "extract": "Python may refer to:",
                "content_urls": {
                    "desktop": { "page": "https://en.wikipedia.org/wiki/Python" }
                }
            }"#,
        )
        .unwrap();
        assert!(PageSummary::from(raw).is_disambiguation);
    }

    #[test]
    fn test_missing_extract_becomes_empty_string() {
        let raw: SummaryResponse = serde_json::from_str(
            r#"{
                "title": "Some Page",
                "content_urls": {
                    "desktop": { "page": "https://en.wikipedia.org/wiki/Some_Page" }
                }
            }"#,
        )
        .unwrap();
        let summary = PageSummary::from(raw);

        assert_eq!(summary.extract, "");
        assert!(!summary.is_disambiguation);
    }

    #[test]
    fn test_missing_title_is_a_parse_failure() {
        let result: Result<SummaryResponse, _> = serde_json::from_str(
            r#"{"extract": "text", "content_urls": {"desktop": {"page": "x"}}}"#,
        );
        assert!(result.is_err());
    }
}
