use std::time::{Duration, Instant};

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT,
};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info};

pub const ISO_CODES_URL: &str = "https://en.wikipedia.org/wiki/ISO_3166-1_alpha-3";
pub const GEOSCHEME_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_countries_and_territories_by_the_United_Nations_geoscheme";

// The source refuses or degrades requests that don't look like a browser.
const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: StatusCode },
}

pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

/// Sequential page fetcher. Every request is preceded by `delay`.
pub struct Fetcher {
    client: reqwest::Client,
    delay: Duration,
}

impl Fetcher {
    pub fn new(delay: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Fetcher { client, delay })
    }

    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if !self.delay.is_zero() {
            debug!("Waiting {:?} before {}", self.delay, url);
            tokio::time::sleep(self.delay).await;
        }

        info!("Fetching {}", url);
        let start = Instant::now();
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        check_status(url, response.status())?;
        let body = response.text().await.map_err(transport)?;

        info!(
            "Fetched {} ({} bytes in {}ms)",
            url,
            body.len(),
            start.elapsed().as_millis()
        );
        Ok(body)
    }
}

/// Anything outside 2xx aborts the run.
pub fn check_status(url: &str, status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status {
            url: url.to_string(),
            status,
        })
    }
}
