use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One validated air-quality reporting station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityStation {
    pub latitude: f64,
    pub longitude: f64,
    pub station_name: String,
    pub city: String,
    pub pm2_5: i32,
}

impl AirQualityStation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn pollution_level(&self) -> PollutionLevel {
        PollutionLevel::from_pm2_5(self.pm2_5)
    }
}

/// A station together with its distance from the query origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestStation {
    pub station: AirQualityStation,
    pub distance: f64,
}

/// One 3-hour forecast slot as returned upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub humidity: i32,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_code: String,
}

/// One entry per forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// "Today" for the first day, otherwise the weekday name.
    pub day_label: String,
    pub temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub description: String,
    pub icon: IconKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconKind {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rainy,
    Windy,
    Snowy,
    Unknown,
}

impl IconKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKind::Sunny => "sunny",
            IconKind::PartlyCloudy => "partly-cloudy",
            IconKind::Cloudy => "cloudy",
            IconKind::Rainy => "rainy",
            IconKind::Windy => "windy",
            IconKind::Snowy => "snowy",
            IconKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for IconKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PM2.5 band used for colouring and describing a station reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PollutionLevel {
    Clean,
    NotClean,
    UnhealthyForSensitive,
    Unhealthy,
    Risky,
    Dangerous,
}

impl PollutionLevel {
    pub fn from_pm2_5(pm2_5: i32) -> Self {
        match pm2_5 {
            300.. => PollutionLevel::Dangerous,
            200..=299 => PollutionLevel::Risky,
            150..=199 => PollutionLevel::Unhealthy,
            100..=149 => PollutionLevel::UnhealthyForSensitive,
            50..=99 => PollutionLevel::NotClean,
            _ => PollutionLevel::Clean,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PollutionLevel::Clean => "Clean",
            PollutionLevel::NotClean => "Not clean",
            PollutionLevel::UnhealthyForSensitive => "Unhealthy for the sensitive group",
            PollutionLevel::Unhealthy => "Unhealthy",
            PollutionLevel::Risky => "Risky",
            PollutionLevel::Dangerous => "Dangerous",
        }
    }

    /// Display colour as `(r, g, b)`.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            PollutionLevel::Clean => (0x00, 0x80, 0x00),
            PollutionLevel::NotClean => (0xD8, 0xA9, 0x1C),
            PollutionLevel::UnhealthyForSensitive => (0xF5, 0x9F, 0x03),
            PollutionLevel::Unhealthy => (0xFF, 0x00, 0x00),
            PollutionLevel::Risky => (0x8A, 0x2B, 0xE2),
            PollutionLevel::Dangerous => (0xA5, 0x2A, 0x2A),
        }
    }

    pub fn hex_color(&self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

/// What happened to one upstream source during a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "kebab-case")]
pub enum SourceStatus {
    Available,
    NoData,
    Failed(String),
}

impl SourceStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, SourceStatus::Available)
    }
}

/// Immutable result of one fetch-transform cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub origin: Coordinates,
    pub fetched_at: DateTime<Utc>,
    pub daily: Vec<DailyForecast>,
    pub forecast_status: SourceStatus,
    pub nearest_station: Option<NearestStation>,
    pub air_quality_status: SourceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pollution_level_band_edges() {
        assert_eq!(PollutionLevel::from_pm2_5(-3), PollutionLevel::Clean);
        assert_eq!(PollutionLevel::from_pm2_5(49), PollutionLevel::Clean);
        assert_eq!(PollutionLevel::from_pm2_5(50), PollutionLevel::NotClean);
        assert_eq!(PollutionLevel::from_pm2_5(100), PollutionLevel::UnhealthyForSensitive);
        assert_eq!(PollutionLevel::from_pm2_5(199), PollutionLevel::Unhealthy);
        assert_eq!(PollutionLevel::from_pm2_5(200), PollutionLevel::Risky);
        assert_eq!(PollutionLevel::from_pm2_5(300), PollutionLevel::Dangerous);
        assert_eq!(PollutionLevel::from_pm2_5(1200), PollutionLevel::Dangerous);
    }

    #[test]
    fn pollution_level_colors() {
        assert_eq!(PollutionLevel::Clean.hex_color(), "#008000");
        assert_eq!(PollutionLevel::Dangerous.hex_color(), "#A52A2A");
        assert_eq!(PollutionLevel::UnhealthyForSensitive.hex_color(), "#F59F03");
    }

    #[test]
    fn source_status_serializes_with_reason() {
        let json = serde_json::to_string(&SourceStatus::Failed("timeout".into())).unwrap();
        assert_eq!(json, r#"{"status":"failed","reason":"timeout"}"#);

        let json = serde_json::to_string(&SourceStatus::NoData).unwrap();
        assert_eq!(json, r#"{"status":"no-data"}"#);
    }
}
