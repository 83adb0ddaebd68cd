//! Page fetching
//!
//! This module loads raw page bodies for the HTML parser:
//! - Building the shared HTTP client with the configured user agent
//! - GET requests bounded by a fixed per-page timeout
//! - Reading `file://` pages from the local filesystem
//! - Error classification into [`PageError`]

use crate::config::UserAgentConfig;
use crate::{PageError, PageResult};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for one page
const MAX_REDIRECTS: usize = 10;

/// A loaded page body
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL the body was actually loaded from, after redirects
    pub final_url: Url,

    /// Page body content
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use tally_crawl::config::UserAgentConfig;
/// use tally_crawl::page::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL)
    let user_agent = match &config.contact_url {
        Some(contact) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    };

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches an HTTP(S) page
///
/// The timeout covers the whole request, including reading the body.
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with HTML (or missing) Content-Type | `Ok(FetchedPage)` |
/// | 2xx with other Content-Type | `ContentMismatch` |
/// | Non-2xx status | `Status` |
/// | Timeout | `Timeout` |
/// | Any other transport error | `Http` |
pub async fn fetch_page(client: &Client, url: &Url, timeout: Duration) -> PageResult<FetchedPage> {
    let response = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PageError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();

    // Check Content-Type
    if let Some(content_type) = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !content_type.contains("html") {
            return Err(PageError::ContentMismatch {
                url: url.to_string(),
                content_type: content_type.to_string(),
            });
        }
    }

    let body = response.text().await.map_err(|e| classify_error(url, e))?;

    Ok(FetchedPage { final_url, body })
}

/// Reads a `file://` page from disk under the same timeout as a fetch
pub async fn read_local_page(url: &Url, timeout: Duration) -> PageResult<FetchedPage> {
    let path = url.to_file_path().map_err(|_| PageError::Io {
        url: url.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a local file path"),
    })?;

    let body = tokio::time::timeout(timeout, tokio::fs::read_to_string(&path))
        .await
        .map_err(|_| PageError::Timeout {
            url: url.to_string(),
        })?
        .map_err(|e| PageError::Io {
            url: url.to_string(),
            source: e,
        })?;

    Ok(FetchedPage {
        final_url: url.clone(),
        body,
    })
}

/// Maps a transport error onto the page error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> PageError {
    if error.is_timeout() {
        PageError::Timeout {
            url: url.to_string(),
        }
    } else {
        PageError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
