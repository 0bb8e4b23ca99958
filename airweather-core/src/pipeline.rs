//! One fetch-transform cycle.
//!
//! The forecast and air-quality sources are fetched concurrently and each is
//! transformed on its own; the results only meet when the snapshot is built.

use chrono::Utc;

use crate::{
    airquality,
    fetch::{FetchOutcome, TextFetcher},
    forecast::{self, DayGrouping},
    model::{Coordinates, DailyForecast, NearestStation, SourceStatus, WeatherSnapshot},
    provider::Providers,
};

pub async fn run(
    fetcher: &dyn TextFetcher,
    providers: &Providers,
    origin: Coordinates,
    grouping: &dyn DayGrouping,
) -> WeatherSnapshot {
    let (forecast_outcome, stations_outcome) = tokio::join!(
        providers.forecast.fetch(fetcher, origin),
        providers.air_quality.fetch(fetcher),
    );

    let (daily, forecast_status) = transform(forecast_outcome, "forecast", |body| {
        let samples = providers.forecast.parse(body);
        forecast::aggregate_with(&samples, grouping)
    });

    let (nearest, air_quality_status) = transform(stations_outcome, "air-quality", |body| {
        let stations = providers.air_quality.parse(body);
        airquality::find_nearest(origin, &stations)
    });

    tracing::info!(
        days = daily.len(),
        station = nearest.as_ref().map(|n| n.station.station_name.as_str()),
        "pipeline finished"
    );

    WeatherSnapshot {
        origin,
        fetched_at: Utc::now(),
        daily,
        forecast_status,
        nearest_station: nearest,
        air_quality_status,
    }
}

/// Run `parse` on a successful body. A body that yields nothing is reported
/// as `NoData`, the same as an empty response.
fn transform<T: Produced>(
    outcome: FetchOutcome,
    source: &str,
    parse: impl FnOnce(&str) -> T,
) -> (T, SourceStatus) {
    let Some(body) = outcome.body() else {
        let status = outcome.status();
        tracing::warn!(source, ?status, "no data from source");
        return (T::default(), status);
    };

    let value = parse(body);
    let status = if value.is_empty() {
        tracing::warn!(source, "source returned no usable records");
        SourceStatus::NoData
    } else {
        SourceStatus::Available
    };

    (value, status)
}

trait Produced: Default {
    fn is_empty(&self) -> bool;
}

impl Produced for Vec<DailyForecast> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl Produced for Option<NearestStation> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }
}
