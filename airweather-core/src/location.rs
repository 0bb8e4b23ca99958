//! Resolving the point a pipeline run is centred on.
//!
//! A location is requested once per run. Besides raw coordinates, a small
//! built-in gazetteer of provinces and their cities is available for picking
//! a place by name.

use async_trait::async_trait;

use crate::{error::LocationError, model::Coordinates};

#[derive(Debug, Clone, Copy)]
pub struct City {
    pub name: &'static str,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy)]
pub struct Province {
    pub name: &'static str,
    pub cities: &'static [City],
}

const fn city(name: &'static str, latitude: f64, longitude: f64) -> City {
    City {
        name,
        coordinates: Coordinates::new(latitude, longitude),
    }
}

pub const PROVINCES: &[Province] = &[
    Province {
        name: "Tehran",
        cities: &[
            city("Tehran", 35.6895, 51.3890),
            city("Firuzkuh", 35.7590, 52.7755),
            city("Damavand", 35.7013, 52.0586),
        ],
    },
    Province {
        name: "Khuzestan",
        cities: &[
            city("Ahvaz", 31.3183, 48.6713),
            city("Abadan", 30.3472, 48.3043),
            city("Dezful", 32.3852, 48.4239),
        ],
    },
    Province {
        name: "Mazandaran",
        cities: &[
            city("Sari", 36.5669, 53.0588),
            city("Ramsar", 36.9020, 50.6571),
            city("Chalus", 36.6580, 51.4225),
        ],
    },
    Province {
        name: "Fars",
        cities: &[
            city("Shiraz", 29.5845, 52.5371),
            city("Nurabad", 30.1146, 51.5284),
            city("Jahrom", 28.5049, 53.5798),
        ],
    },
    Province {
        name: "Markazi",
        cities: &[
            city("Arak", 34.0917, 49.6892),
            city("Khomein", 33.6361, 50.0784),
            city("Mahalat", 33.9112, 50.4551),
        ],
    },
];

pub fn find_province(name: &str) -> Result<&'static Province, LocationError> {
    PROVINCES
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| LocationError::UnknownProvince(name.to_string()))
}

/// Look a city up by name, optionally restricted to one province.
///
/// Without a province the first match across all provinces wins, so
/// "Tehran" resolves to the city rather than failing on the province name.
pub fn find_city(province: Option<&str>, name: &str) -> Result<&'static City, LocationError> {
    let wanted = name.trim();
    let matches = |c: &&City| c.name.eq_ignore_ascii_case(wanted);

    let found = match province {
        Some(p) => find_province(p)?.cities.iter().find(matches),
        None => PROVINCES.iter().flat_map(|p| p.cities.iter()).find(matches),
    };

    found.ok_or_else(|| LocationError::UnknownCity {
        city: name.to_string(),
        province: province.map(str::to_string),
    })
}

/// One-shot source of the current position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        let Coordinates { latitude, longitude } = self.0;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::Unavailable(format!(
                "coordinates out of range: {}",
                self.0
            )));
        }
        Ok(self.0)
    }
}

#[derive(Debug, Clone)]
pub struct GazetteerLocation {
    pub province: Option<String>,
    pub city: String,
}

#[async_trait]
impl LocationProvider for GazetteerLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        find_city(self.province.as_deref(), &self.city).map(|c| c.coordinates)
    }
}
