use std::fmt::Write;

use airweather_core::{SourceStatus, WeatherSnapshot, location::PROVINCES};
use chrono::Local;

pub fn snapshot(snapshot: &WeatherSnapshot) -> String {
    let mut out = String::new();
    let fetched = snapshot.fetched_at.with_timezone(&Local);

    let _ = writeln!(
        out,
        "Weather near {} (fetched {})",
        snapshot.origin,
        fetched.format("%Y-%m-%d %H:%M")
    );

    out.push_str("\nForecast\n");
    if snapshot.forecast_status.is_available() {
        for day in &snapshot.daily {
            let _ = writeln!(
                out,
                "  {:<10} {:>6.1}°C  ({:.1} .. {:.1})  {} [{}]",
                day.day_label,
                day.temperature,
                day.min_temperature,
                day.max_temperature,
                day.description,
                day.icon,
            );
        }
    } else {
        unavailable(&mut out, "forecast", &snapshot.forecast_status);
    }

    out.push_str("\nAir quality\n");
    match (&snapshot.air_quality_status, &snapshot.nearest_station) {
        (SourceStatus::Available, Some(nearest)) => {
            let station = &nearest.station;
            let level = station.pollution_level();
            let _ = writeln!(
                out,
                "  Station: {}, {} (distance {:.4})",
                station.station_name, station.city, nearest.distance
            );
            let _ = writeln!(
                out,
                "  PM2.5:   {} - {} ({})",
                station.pm2_5,
                level.description(),
                level.hex_color()
            );
        }
        (status, _) => unavailable(&mut out, "air quality", status),
    }

    out
}

fn unavailable(out: &mut String, what: &str, status: &SourceStatus) {
    let _ = match status {
        SourceStatus::Failed(reason) => writeln!(out, "  {what} unavailable: {reason}"),
        _ => writeln!(out, "  no {what} data available"),
    };
}

pub fn cities() -> String {
    let mut out = String::new();
    for province in PROVINCES {
        let _ = writeln!(out, "{}", province.name);
        for city in province.cities {
            let _ = writeln!(out, "  {:<10} {}", city.name, city.coordinates);
        }
    }
    out
}
