use anyhow::Result;
use reqwest::Url;

use crate::{
    airquality,
    fetch::{FetchOutcome, TextFetcher},
    model::AirQualityStation,
    provider::ProviderId,
};

pub const STATIONS_URL: &str = "https://aqms.doe.ir/Home/LoadAQIMap?id=1";

/// Air-quality monitoring station feed.
#[derive(Debug, Clone)]
pub struct AqmsProvider {
    url: Url,
}

impl AqmsProvider {
    pub fn new(url: &str) -> Result<Self> {
        let url = ProviderId::Aqms.parse_endpoint(url)?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub async fn fetch(&self, fetcher: &dyn TextFetcher) -> FetchOutcome {
        tracing::debug!(url = %self.url, "fetching air-quality stations");
        fetcher.fetch(self.url.as_str()).await
    }

    pub fn parse(&self, body: &str) -> Vec<AirQualityStation> {
        airquality::normalize(body)
    }
}
