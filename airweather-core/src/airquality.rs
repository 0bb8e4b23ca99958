//! Air-quality station normalization and nearest-station selection.
//!
//! The upstream station feed is a loosely-typed JSON array. Elements that are
//! missing any of the five required keys, or carry a value of the wrong type,
//! are dropped individually; a payload that is not an array at all yields no
//! stations.

use serde_json::{Map, Value};

use crate::{
    error::DecodeError,
    model::{AirQualityStation, Coordinates, NearestStation},
};

const KEY_LATITUDE: &str = "Latitude";
const KEY_LONGITUDE: &str = "Longitude";
const KEY_STATION_NAME: &str = "StationName_En";
const KEY_CITY: &str = "City";
const KEY_PM2_5: &str = "PM2_5";

/// Decode raw station JSON, degrading any top-level failure to an empty list.
pub fn normalize(raw: &str) -> Vec<AirQualityStation> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    match decode_stations(raw) {
        Ok(stations) => stations,
        Err(err) => {
            tracing::warn!("discarding air-quality payload: {err}");
            Vec::new()
        }
    }
}

/// Like [`normalize`], but reports why the payload as a whole was rejected.
pub fn decode_stations(raw: &str) -> Result<Vec<AirQualityStation>, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;

    match value {
        Value::Array(items) => Ok(normalize_values(&items)),
        other => Err(DecodeError::NotAnArray(json_kind(&other))),
    }
}

pub fn normalize_values(items: &[Value]) -> Vec<AirQualityStation> {
    let stations: Vec<AirQualityStation> = items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let station = item.as_object().and_then(station_from_object);
            if station.is_none() {
                tracing::debug!(index = idx, "dropping incomplete air-quality record");
            }
            station
        })
        .collect();

    tracing::debug!(
        kept = stations.len(),
        dropped = items.len() - stations.len(),
        "normalized air-quality stations"
    );

    stations
}

fn station_from_object(obj: &Map<String, Value>) -> Option<AirQualityStation> {
    Some(AirQualityStation {
        latitude: float_field(obj, KEY_LATITUDE)?,
        longitude: float_field(obj, KEY_LONGITUDE)?,
        station_name: string_field(obj, KEY_STATION_NAME)?,
        city: string_field(obj, KEY_CITY)?,
        pm2_5: int_field(obj, KEY_PM2_5)?,
    })
}

// Numeric fields also arrive as quoted numbers from some station exports.
fn float_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn int_field(obj: &Map<String, Value>, key: &str) -> Option<i32> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)?.as_str().map(str::to_owned)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Straight-line distance in degree space.
///
/// This is not a great-circle distance; it is only meaningful for comparing
/// stations within the same region.
pub fn planar_distance(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = b.latitude - a.latitude;
    let d_lon = b.longitude - a.longitude;
    (d_lat * d_lat + d_lon * d_lon).sqrt()
}

/// Closest station to `origin`; the earliest station wins on ties.
pub fn find_nearest(origin: Coordinates, stations: &[AirQualityStation]) -> Option<NearestStation> {
    let mut best: Option<(&AirQualityStation, f64)> = None;
    let mut best_distance = f64::INFINITY;

    for station in stations {
        let distance = planar_distance(origin, station.coordinates());
        if distance < best_distance {
            best_distance = distance;
            best = Some((station, distance));
        }
    }

    best.map(|(station, distance)| NearestStation {
        station: station.clone(),
        distance,
    })
}
