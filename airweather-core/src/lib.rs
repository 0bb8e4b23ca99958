//! Core library for the `airweather` CLI.
//!
//! This crate defines:
//! - Air-quality station normalization and nearest-station selection
//! - Aggregation of 3-hour forecast samples into daily summaries
//! - The fetch contract and the two upstream providers
//! - Configuration & credentials handling
//! - The fetch-transform pipeline producing a [`WeatherSnapshot`]
//!
//! It is used by `airweather-cli`, but can also be reused by other front ends.

pub mod airquality;
pub mod config;
pub mod error;
pub mod fetch;
pub mod forecast;
pub mod location;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use config::{Config, ProviderConfig};
pub use error::{DecodeError, FetchError, LocationError};
pub use fetch::{FetchOutcome, HttpFetcher, TextFetcher};
pub use forecast::{ByCalendarDate, ByWeekday, DayGrouping, GroupingStrategy};
pub use location::{FixedLocation, GazetteerLocation, LocationProvider};
pub use model::{
    AirQualityStation, Coordinates, DailyForecast, ForecastSample, IconKind, NearestStation,
    PollutionLevel, SourceStatus, WeatherSnapshot,
};
pub use provider::{ProviderId, Providers, providers_from_config};
