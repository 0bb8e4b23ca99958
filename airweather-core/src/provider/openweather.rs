use anyhow::Result;
use chrono::NaiveDateTime;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::DecodeError,
    fetch::{FetchOutcome, TextFetcher},
    model::{Coordinates, ForecastSample},
    provider::ProviderId,
};

pub const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 5-day / 3-hour forecast endpoint.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: Url,
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: &str) -> Result<Self> {
        let base_url = ProviderId::OpenWeather.parse_endpoint(base_url)?;
        Ok(Self { api_key, base_url })
    }

    pub fn forecast_url(&self, at: Coordinates) -> String {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &at.latitude.to_string())
            .append_pair("lon", &at.longitude.to_string())
            .append_pair("appid", &self.api_key)
            .append_pair("units", "metric");
        url.into()
    }

    pub async fn fetch(&self, fetcher: &dyn TextFetcher, at: Coordinates) -> FetchOutcome {
        tracing::debug!(base = %self.base_url, lat = at.latitude, lon = at.longitude, "fetching forecast");
        fetcher.fetch(&self.forecast_url(at)).await
    }

    /// Decode a forecast body, degrading a malformed payload to no samples.
    pub fn parse(&self, body: &str) -> Vec<ForecastSample> {
        match decode_forecast(body) {
            Ok(samples) => samples,
            Err(err) => {
                tracing::warn!("discarding forecast payload: {err}");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    // Entries are decoded one at a time so a bad slot only loses itself.
    list: Vec<Value>,
}

/// Decode the upstream forecast body into samples, in upstream order.
///
/// A broken top-level document is an error; individual slots that fail to
/// decode (missing fields, unparseable `dt_txt`) are skipped.
pub fn decode_forecast(body: &str) -> Result<Vec<ForecastSample>, DecodeError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)?;

    let total = parsed.list.len();
    let samples: Vec<ForecastSample> = parsed.list.into_iter().filter_map(sample_from_value).collect();

    tracing::debug!(
        city = %parsed.city.name,
        kept = samples.len(),
        dropped = total - samples.len(),
        "decoded forecast samples"
    );

    Ok(samples)
}

fn sample_from_value(value: Value) -> Option<ForecastSample> {
    let entry: OwForecastEntry = match serde_json::from_value(value) {
        Ok(entry) => entry,
        Err(err) => {
            tracing::debug!("dropping forecast slot: {err}");
            return None;
        }
    };

    let timestamp = match NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT) {
        Ok(ts) => ts,
        Err(err) => {
            tracing::debug!(dt_txt = %entry.dt_txt, "dropping forecast slot: {err}");
            return None;
        }
    };

    let (condition_main, condition_description, icon_code) = entry
        .weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.description, w.icon))
        .unwrap_or_default();

    Some(ForecastSample {
        timestamp,
        temperature: entry.main.temp,
        min_temperature: entry.main.temp_min,
        max_temperature: entry.main.temp_max,
        humidity: entry.main.humidity,
        condition_main,
        condition_description,
        icon_code,
    })
}
