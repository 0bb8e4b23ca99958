use crate::{
    Config,
    provider::{aqms::AqmsProvider, openweather::OpenWeatherProvider},
};
use anyhow::Context;
use reqwest::Url;
use std::convert::TryFrom;

pub mod aqms;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Aqms,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Aqms => "aqms",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::Aqms]
    }

    pub fn default_url(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => openweather::FORECAST_URL,
            ProviderId::Aqms => aqms::STATIONS_URL,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }

    /// Parse an endpoint override; only absolute http(s) urls are accepted.
    pub fn parse_endpoint(&self, url: &str) -> anyhow::Result<Url> {
        let parsed = Url::parse(url.trim())
            .with_context(|| format!("Invalid {self} endpoint url: {url}"))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("Invalid {self} endpoint url: {url} (expected http or https)");
        }

        Ok(parsed)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "aqms" => Ok(ProviderId::Aqms),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, aqms."
            )),
        }
    }
}

/// The two upstream sources a pipeline run reads from.
#[derive(Debug, Clone)]
pub struct Providers {
    pub forecast: OpenWeatherProvider,
    pub air_quality: AqmsProvider,
}

/// Construct both providers from config.
pub fn providers_from_config(config: &Config) -> anyhow::Result<Providers> {
    let api_key = config.provider_api_key(ProviderId::OpenWeather).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{}'.\n\
                 Hint: run `airweather configure {}` and enter your API key.",
            ProviderId::OpenWeather,
            ProviderId::OpenWeather,
        )
    })?;

    let forecast =
        OpenWeatherProvider::new(api_key.to_owned(), config.provider_url(ProviderId::OpenWeather))?;
    let air_quality = AqmsProvider::new(config.provider_url(ProviderId::Aqms))?;

    Ok(Providers { forecast, air_quality })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("weatherapi").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn parse_endpoint_accepts_http_urls_only() {
        let url = ProviderId::Aqms.parse_endpoint(" http://localhost:8080/map?id=1 ").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/map?id=1");

        let err = ProviderId::OpenWeather.parse_endpoint("forecast").unwrap_err();
        assert!(err.to_string().contains("Invalid openweather endpoint url"));

        let err = ProviderId::Aqms.parse_endpoint("ftp://example.com/map").unwrap_err();
        assert!(err.to_string().contains("expected http or https"));
    }

    #[test]
    fn providers_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = providers_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured for provider 'openweather'"));
        assert!(msg.contains("Hint: run `airweather configure openweather`"));
    }

    #[test]
    fn providers_from_config_uses_default_urls() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".to_string());

        let providers = providers_from_config(&cfg).expect("providers should build");
        assert_eq!(providers.air_quality.url(), aqms::STATIONS_URL);
    }

    #[test]
    fn providers_from_config_rejects_bad_url_override() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".to_string());
        cfg.set_provider_url(ProviderId::Aqms, "not a url".to_string());

        assert!(providers_from_config(&cfg).is_err());
    }
}
