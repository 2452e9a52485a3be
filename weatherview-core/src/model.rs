use chrono::{DateTime, Utc};
use serde::Serialize;

/// Geographic position as reported by a geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Resolved input to one weather fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates(Coordinates),
    Name(String),
}

impl LocationQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn by_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::Coordinates(Coordinates::new(latitude, longitude))
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::Coordinates(c) => write!(f, "({:.4}, {:.4})", c.latitude, c.longitude),
            LocationQuery::Name(name) => f.write_str(name),
        }
    }
}

/// Current conditions for one place, in imperial units.
///
/// Only ever built from a complete provider response, so every field is
/// populated together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReading {
    pub place_name: String,
    pub temperature_f: f64,
    pub feels_like_f: f64,
    pub humidity_pct: u8,
    pub wind_speed_mph: f64,
    /// Short condition group, e.g. "Clouds".
    pub condition: String,
    /// Provider icon identifier, e.g. "04d".
    pub icon: String,
    pub observed_at: DateTime<Utc>,
}

impl WeatherReading {
    pub fn temperature_display(&self) -> String {
        format_degrees(self.temperature_f)
    }

    pub fn feels_like_display(&self) -> String {
        format_degrees(self.feels_like_f)
    }

    pub fn humidity_display(&self) -> String {
        format!("{}%", self.humidity_pct)
    }

    pub fn wind_display(&self) -> String {
        format!("{} MPH", round_whole(self.wind_speed_mph))
    }
}

/// Rounds half away from zero, so 71.5 becomes 72 and -0.5 becomes -1.
pub fn round_whole(value: f64) -> i64 {
    value.round() as i64
}

pub fn format_degrees(value: f64) -> String {
    format!("{}°F", round_whole(value))
}
