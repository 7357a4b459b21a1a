use reqwest::header;
use std::time::Duration;
use thiserror::Error;

/// How retrieving one remote resource can fail. Failures are values the
/// assembler can render, not just log lines.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Transport(String),
}

/// A capability for retrieving the text of a named remote resource.
#[allow(async_fn_in_trait)]
pub trait ResourceFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// Fetches resources over HTTP from a fixed base URL, bypassing caches and
/// bounding every request with a timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("chapbook/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let request = async {
            let response = self
                .client
                .get(self.url_for(path))
                .header(header::PRAGMA, "no-cache")
                .header(header::CACHE_CONTROL, "no-cache")
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;
            if !response.status().is_success() {
                return Err(FetchError::Status(response.status().as_u16()));
            }
            response
                .text()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))
        };

        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base: &str) -> HttpFetcher {
        HttpFetcher::new(base, Duration::from_secs(1))
    }

    #[test]
    fn url_join() {
        let f = fetcher("https://example.org/book");
        assert_eq!(
            f.url_for("text/chapter1.md"),
            "https://example.org/book/text/chapter1.md"
        );
    }

    #[test]
    fn url_join_with_stray_slashes() {
        let f = fetcher("https://example.org/book/");
        assert_eq!(f.url_for("/README.md"), "https://example.org/book/README.md");
    }

    #[test]
    fn error_messages() {
        assert_eq!(FetchError::Status(500).to_string(), "HTTP status 500");
        assert_eq!(
            FetchError::Transport("oops".into()).to_string(),
            "network error: oops"
        );
    }
}
