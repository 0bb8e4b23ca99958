use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{error::FetchError, model::SourceStatus};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a single upstream GET.
#[derive(Debug)]
pub enum FetchOutcome {
    Body(String),
    /// Request succeeded but returned nothing worth parsing.
    Empty,
    Failed(FetchError),
}

impl FetchOutcome {
    /// Collapse to the plain-text contract: any failure becomes `""`.
    pub fn into_text(self) -> String {
        match self {
            FetchOutcome::Body(body) => body,
            FetchOutcome::Empty | FetchOutcome::Failed(_) => String::new(),
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            FetchOutcome::Body(body) => Some(body),
            _ => None,
        }
    }

    pub fn status(&self) -> SourceStatus {
        match self {
            FetchOutcome::Body(_) => SourceStatus::Available,
            FetchOutcome::Empty => SourceStatus::NoData,
            FetchOutcome::Failed(err) => SourceStatus::Failed(err.to_string()),
        }
    }

    fn from_body(body: String) -> Self {
        if body.trim().is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Body(body)
        }
    }
}

#[async_trait]
pub trait TextFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Fetch `url` and return its body, or an empty string if anything went wrong.
pub async fn fetch_text(fetcher: &dyn TextFetcher, url: &str) -> String {
    fetcher.fetch(url).await.into_text()
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("airweather/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self { http })
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let res = self.http.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            // the body is only context for the message
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(res.text().await?)
    }
}

#[async_trait]
impl TextFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        match self.get(url).await {
            Ok(body) => FetchOutcome::from_body(body),
            Err(err) => {
                // reqwest errors carry the full url, query string included
                let err = match err {
                    FetchError::Transport(e) => FetchError::Transport(e.without_url()),
                    other => other,
                };
                tracing::warn!("fetch failed: {err}");
                FetchOutcome::Failed(err)
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
