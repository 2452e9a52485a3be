//! Core library for the `weatherview` current-conditions viewer.
//!
//! This crate defines:
//! - Configuration & the single OpenWeather credential
//! - Location resolution with a fallback place name
//! - The OpenWeather current-weather fetcher
//! - `WeatherViewModel`, which owns the presentation state
//!
//! It is used by `weatherview-cli`, but any other front end can drive the view model.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod view_model;

pub use config::Config;
pub use error::{FetchError, LocationError};
pub use location::{FixedPosition, Geolocator, IpGeolocator};
pub use model::{Coordinates, LocationQuery, WeatherReading};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use view_model::{ActivationPhase, FetchTicket, Key, PresentationState, SearchField, WeatherViewModel};
