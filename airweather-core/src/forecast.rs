//! Daily aggregation of 3-hour forecast samples.
//!
//! Samples are bucketed by a [`DayGrouping`] policy. Buckets are emitted in
//! the order their key is first seen; the first bucket is labelled "Today"
//! and shows its first sample's instantaneous temperature, every other bucket
//! shows the midpoint of its min/max range.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::{DailyForecast, ForecastSample, IconKind};

pub const TODAY_LABEL: &str = "Today";

/// Decides which samples belong to the same displayed day.
pub trait DayGrouping: Send + Sync {
    fn group_key(&self, timestamp: &NaiveDateTime) -> String;
}

/// Groups by weekday name.
///
/// Two calendar dates that fall on the same weekday share a bucket, so a
/// range longer than seven days merges e.g. both Mondays into one entry and
/// their min/max ranges are combined. The usual 5-day upstream range never
/// triggers this. Use [`ByCalendarDate`] to keep every date separate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByWeekday;

impl DayGrouping for ByWeekday {
    fn group_key(&self, timestamp: &NaiveDateTime) -> String {
        weekday_name(timestamp.weekday()).to_string()
    }
}

/// One bucket per calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByCalendarDate;

impl DayGrouping for ByCalendarDate {
    fn group_key(&self, timestamp: &NaiveDateTime) -> String {
        timestamp.date().format("%Y-%m-%d").to_string()
    }
}

/// Config/CLI-facing selector for a [`DayGrouping`] policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingStrategy {
    #[default]
    Weekday,
    CalendarDate,
}

impl GroupingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingStrategy::Weekday => "weekday",
            GroupingStrategy::CalendarDate => "calendar-date",
        }
    }

    pub fn policy(&self) -> &'static dyn DayGrouping {
        match self {
            GroupingStrategy::Weekday => &ByWeekday,
            GroupingStrategy::CalendarDate => &ByCalendarDate,
        }
    }
}

impl std::fmt::Display for GroupingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GroupingStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekday" => Ok(GroupingStrategy::Weekday),
            "calendar-date" | "date" => Ok(GroupingStrategy::CalendarDate),
            _ => Err(anyhow::anyhow!(
                "Unknown grouping '{s}'. Supported groupings: weekday, calendar-date."
            )),
        }
    }
}

/// Full English weekday name, independent of the host locale.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// Ordered: "partly cloudy" has to win over the broader "cloud".
const ICON_RULES: &[(&str, IconKind)] = &[
    ("clear sky", IconKind::Sunny),
    ("partly cloudy", IconKind::PartlyCloudy),
    ("cloud", IconKind::Cloudy),
    ("rain", IconKind::Rainy),
    ("wind", IconKind::Windy),
    ("snow", IconKind::Snowy),
];

pub fn classify_icon(description: &str) -> IconKind {
    let lower = description.to_lowercase();
    ICON_RULES
        .iter()
        .find(|(keyword, _)| lower.contains(*keyword))
        .map(|(_, kind)| *kind)
        .unwrap_or(IconKind::Unknown)
}

struct DayBucket<'a> {
    first: &'a ForecastSample,
    min: f64,
    max: f64,
}

/// Aggregate with the default weekday grouping.
pub fn aggregate(samples: &[ForecastSample]) -> Vec<DailyForecast> {
    aggregate_with(samples, &ByWeekday)
}

pub fn aggregate_with(samples: &[ForecastSample], grouping: &dyn DayGrouping) -> Vec<DailyForecast> {
    let mut buckets: Vec<DayBucket<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for sample in samples {
        let key = grouping.group_key(&sample.timestamp);
        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(DayBucket {
                first: sample,
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            });
            buckets.len() - 1
        });

        let bucket = &mut buckets[slot];
        bucket.min = bucket.min.min(sample.min_temperature);
        bucket.max = bucket.max.max(sample.max_temperature);
    }

    tracing::debug!(samples = samples.len(), days = buckets.len(), "aggregated forecast");

    buckets
        .iter()
        .enumerate()
        .map(|(pos, bucket)| {
            let is_today = pos == 0;
            let description = bucket.first.condition_description.clone();

            DailyForecast {
                day_label: if is_today {
                    TODAY_LABEL.to_string()
                } else {
                    weekday_name(bucket.first.timestamp.weekday()).to_string()
                },
                temperature: if is_today {
                    bucket.first.temperature
                } else {
                    round2((bucket.min + bucket.max) / 2.0)
                },
                min_temperature: bucket.min,
                max_temperature: bucket.max,
                icon: classify_icon(&description),
                description,
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn sample(ts: &str, temp: f64, min: f64, max: f64, description: &str) -> ForecastSample {
        ForecastSample {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            temperature: temp,
            min_temperature: min,
            max_temperature: max,
            humidity: 60,
            condition_main: "Clouds".to_string(),
            condition_description: description.to_string(),
            icon_code: "04d".to_string(),
        }
    }

    /// 40 samples at 3-hour intervals starting at `start`.
    fn five_days(start: NaiveDateTime) -> Vec<ForecastSample> {
        (0..40)
            .map(|i| {
                let ts = start + Duration::hours(3 * i);
                let base = i as f64 * 0.37;
                ForecastSample {
                    timestamp: ts,
                    temperature: 10.0 + base,
                    min_temperature: 8.0 + base,
                    max_temperature: 12.5 + base,
                    humidity: 50,
                    condition_main: "Clear".to_string(),
                    condition_description: format!("slot {i}"),
                    icon_code: "01d".to_string(),
                }
            })
            .collect()
    }

    #[test]
    fn same_day_uses_first_temperature_and_full_range() {
        let samples = vec![
            sample("2024-01-01 00:00:00", 10.0, 8.0, 12.0, "light rain"),
            sample("2024-01-01 12:00:00", 15.0, 9.0, 16.0, "clear sky"),
        ];

        let days = aggregate(&samples);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day_label, "Today");
        assert_eq!(days[0].temperature, 10.0);
        assert_eq!(days[0].min_temperature, 8.0);
        assert_eq!(days[0].max_temperature, 16.0);
        assert_eq!(days[0].description, "light rain");
        assert_eq!(days[0].icon, IconKind::Rainy);
    }

    #[test]
    fn five_day_range_yields_five_entries() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let samples = five_days(start);

        let days = aggregate(&samples);

        assert_eq!(days.len(), 5);
        assert_eq!(days[0].day_label, "Today");
        assert_eq!(days[0].temperature, samples[0].temperature);
        let labels: Vec<&str> = days[1..].iter().map(|d| d.day_label.as_str()).collect();
        assert_eq!(labels, ["Tuesday", "Wednesday", "Thursday", "Friday"]);

        for (day_idx, day) in days.iter().enumerate().skip(1) {
            let group = &samples[day_idx * 8..(day_idx + 1) * 8];
            let min = group.iter().map(|s| s.min_temperature).fold(f64::INFINITY, f64::min);
            let max = group.iter().map(|s| s.max_temperature).fold(f64::NEG_INFINITY, f64::max);

            assert_eq!(day.min_temperature, min);
            assert_eq!(day.max_temperature, max);
            assert_eq!(day.temperature, ((min + max) / 2.0 * 100.0).round() / 100.0);
            assert_eq!(day.description, group[0].condition_description);
        }
    }

    #[test]
    fn midday_start_still_gives_today_first() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let samples = five_days(start);

        let days = aggregate(&samples);

        // 15:00 start spills into a sixth calendar day.
        assert_eq!(days.len(), 6);
        assert_eq!(days[0].day_label, "Today");
        assert_eq!(days[0].temperature, 10.0);
        assert_eq!(days[1].day_label, "Tuesday");
    }

    #[test]
    fn average_is_rounded_to_two_places() {
        let samples = vec![
            sample("2024-01-01 00:00:00", 1.0, 1.0, 1.0, "clear sky"),
            sample("2024-01-02 00:00:00", 5.0, 1.001, 2.0, "few clouds"),
            sample("2024-01-02 03:00:00", 5.0, 3.0, 2.337, "few clouds"),
        ];

        let days = aggregate(&samples);

        assert_eq!(days[1].day_label, "Tuesday");
        assert_eq!(days[1].min_temperature, 1.001);
        assert_eq!(days[1].max_temperature, 2.337);
        assert_eq!(days[1].temperature, 1.67);
        assert_eq!(days[1].icon, IconKind::Cloudy);
    }

    #[test]
    fn negative_temperatures_keep_true_maximum() {
        let samples = vec![
            sample("2024-01-01 00:00:00", -5.0, -7.0, -4.0, "snow"),
            sample("2024-01-02 00:00:00", -9.0, -12.0, -8.5, "light snow"),
        ];

        let days = aggregate(&samples);

        assert_eq!(days[1].max_temperature, -8.5);
        assert_eq!(days[1].temperature, -10.25);
        assert_eq!(days[1].icon, IconKind::Snowy);
    }

    #[test]
    fn weekday_grouping_merges_dates_a_week_apart() {
        let samples = vec![
            sample("2024-01-01 00:00:00", 3.0, 2.0, 4.0, "clear sky"),
            sample("2024-01-02 00:00:00", 3.0, 2.0, 4.0, "clear sky"),
            sample("2024-01-08 00:00:00", 3.0, -1.0, 9.0, "rain"),
        ];

        let by_weekday = aggregate(&samples);
        assert_eq!(by_weekday.len(), 2);
        assert_eq!(by_weekday[0].min_temperature, -1.0);
        assert_eq!(by_weekday[0].max_temperature, 9.0);

        let by_date = aggregate_with(&samples, &ByCalendarDate);
        assert_eq!(by_date.len(), 3);
        assert_eq!(by_date[0].max_temperature, 4.0);
        assert_eq!(by_date[2].day_label, "Monday");
        assert_eq!(by_date[2].temperature, 4.0);
    }

    #[test]
    fn output_follows_first_seen_order() {
        let samples = vec![
            sample("2024-01-03 00:00:00", 1.0, 1.0, 1.0, "a"),
            sample("2024-01-01 00:00:00", 1.0, 1.0, 1.0, "b"),
            sample("2024-01-03 03:00:00", 1.0, 1.0, 1.0, "c"),
        ];

        let days = aggregate(&samples);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_label, "Today");
        assert_eq!(days[0].description, "a");
        assert_eq!(days[1].day_label, "Monday");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn icon_rules_are_ordered() {
        assert_eq!(classify_icon("Partly cloudy with light rain"), IconKind::PartlyCloudy);
        assert_eq!(classify_icon("CLEAR SKY"), IconKind::Sunny);
        assert_eq!(classify_icon("overcast clouds"), IconKind::Cloudy);
        assert_eq!(classify_icon("moderate rain"), IconKind::Rainy);
        assert_eq!(classify_icon("windy"), IconKind::Windy);
        assert_eq!(classify_icon("heavy snow"), IconKind::Snowy);
        assert_eq!(classify_icon("mist"), IconKind::Unknown);
        assert_eq!(classify_icon(""), IconKind::Unknown);
    }

    #[test]
    fn grouping_strategy_parses() {
        assert_eq!("weekday".parse::<GroupingStrategy>().unwrap(), GroupingStrategy::Weekday);
        assert_eq!(
            "Calendar-Date".parse::<GroupingStrategy>().unwrap(),
            GroupingStrategy::CalendarDate
        );
        assert!("fortnight".parse::<GroupingStrategy>().is_err());
    }
}
