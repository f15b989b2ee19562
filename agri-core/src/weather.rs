//! Seasonal weather lookup by city name or coordinates.
//!
//! Resolution never calls out to a live weather API: cities come from a bundled
//! table and coordinates are bucketed into a north/south India record.

use std::collections::HashMap;
use tracing::debug;

use crate::{
    error::ResolveError,
    model::{CURRENT_LOCATION, CityWeatherRecord, WeatherQuery, WeatherRequest, WeatherResult},
};

pub mod cities;

pub use cities::{
    CITY_WEATHER, DEFAULT_SUGGESTION_LIMIT, DEFAULT_WEATHER, SUGGESTED_CITIES, suggest,
};

/// Latitudes strictly above this count as north India.
pub const NORTH_LATITUDE_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    North,
    South,
}

impl Region {
    pub fn from_latitude(latitude: f64) -> Self {
        if latitude > NORTH_LATITUDE_THRESHOLD {
            Region::North
        } else {
            Region::South
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "north",
            Region::South => "south",
        }
    }

    pub const fn record(&self) -> CityWeatherRecord {
        match self {
            Region::North => CityWeatherRecord::new(30.0, 800.0, 65.0),
            Region::South => CityWeatherRecord::new(28.0, 1200.0, 75.0),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capitalize the first character and lowercase the rest.
///
/// Multi-word names are treated as one word, so "new delhi" becomes "New delhi".
pub fn normalize_city(input: &str) -> String {
    let mut chars = input.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// How a city query was matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CityMatch {
    Exact(&'static str),
    Partial(&'static str),
    Default,
}

/// Read-only resolver over the bundled city table. Build once, share freely.
#[derive(Debug, Clone)]
pub struct WeatherResolver {
    table: &'static [(&'static str, CityWeatherRecord)],
    index: HashMap<&'static str, CityWeatherRecord>,
    fallback: CityWeatherRecord,
}

impl Default for WeatherResolver {
    fn default() -> Self {
        Self::new(CITY_WEATHER, DEFAULT_WEATHER)
    }
}

impl WeatherResolver {
    pub fn new(
        table: &'static [(&'static str, CityWeatherRecord)],
        fallback: CityWeatherRecord,
    ) -> Self {
        let index = table.iter().map(|(name, record)| (*name, *record)).collect();

        Self {
            table,
            index,
            fallback,
        }
    }

    pub fn resolve(&self, query: &WeatherQuery) -> WeatherResult {
        match query {
            WeatherQuery::City(city) => {
                let (_, record) = self.lookup_city(city);
                WeatherResult::shaped(city.clone(), &record)
            }
            WeatherQuery::Coordinates {
                latitude,
                longitude,
            } => {
                let region = Region::from_latitude(*latitude);
                debug!(latitude, longitude, %region, "resolved weather from coordinates");
                WeatherResult::shaped(CURRENT_LOCATION.to_string(), &region.record())
            }
        }
    }

    /// Validate a raw request and resolve it.
    pub fn resolve_request(
        &self,
        request: WeatherRequest,
    ) -> Result<WeatherResult, ResolveError> {
        let query = WeatherQuery::try_from(request)?;
        Ok(self.resolve(&query))
    }

    /// Exact match after normalization, then the first table entry in declared
    /// order where either name contains the other, then the fallback record.
    pub fn lookup_city(&self, city: &str) -> (CityMatch, CityWeatherRecord) {
        let normalized = normalize_city(city);

        if let Some((name, record)) = self.index.get_key_value(normalized.as_str()) {
            debug!(city, matched = name, "exact city match");
            return (CityMatch::Exact(*name), *record);
        }

        let needle = normalized.to_lowercase();
        let partial = self.table.iter().find(|(name, _)| {
            let key = name.to_lowercase();
            key.contains(&needle) || needle.contains(&key)
        });

        match partial {
            Some((name, record)) => {
                debug!(city, matched = name, "partial city match");
                (CityMatch::Partial(*name), *record)
            }
            None => {
                debug!(city, "no city match, using default conditions");
                (CityMatch::Default, self.fallback)
            }
        }
    }
}
