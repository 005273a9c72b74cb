//! Remote source client
//!
//! One GET per call, no retries. Timeouts come from the underlying
//! `reqwest::Client` and surface as [`Error::Timeout`].

use async_trait::async_trait;
use holonet_common::{Error, Page, Result};
use std::time::Duration;

const USER_AGENT: &str = concat!("holonet-ag/", env!("CARGO_PKG_VERSION"));

/// Paginated data source
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page; `url` is a collection root or a `?page=N` URL
    async fn fetch_page(&self, url: &str) -> Result<Page>;
}

/// HTTP implementation of [`PageSource`]
pub struct HttpPageSource {
    http_client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, url: &str) -> Result<Page> {
        tracing::debug!(url = %url, "Fetching page");
        let body = get_bytes(&self.http_client, url).await?;
        Page::from_slice(&body)
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
}

/// GET `url` and return the body of a 2xx response
pub(crate) async fn get_bytes(http_client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = http_client
        .get(url)
        .send()
        .await
        .map_err(|e| map_reqwest_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(Error::Fetch {
            url: url.to_string(),
            status: Some(status.as_u16()),
            message: format!("upstream returned {}: {}", status, error_text),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| map_reqwest_error(url, e))?;
    Ok(body.to_vec())
}

fn map_reqwest_error(url: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout {
            url: url.to_string(),
        }
    } else {
        Error::Fetch {
            url: url.to_string(),
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}
