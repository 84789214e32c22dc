//! Core library for the `geoweather` service.
//!
//! This crate defines:
//! - Coordinate validation and normalization
//! - Weather and reverse-geocoding providers (Open-Meteo, Nominatim)
//! - The summary handler and its HTTP router
//! - Configuration loading
//!
//! It is used by `geoweather-cli`, but can also be embedded in other services.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod handler;
pub mod model;
pub mod provider;
pub mod server;
pub mod summary;

pub use config::{Config, ProviderConfig};
pub use coordinate::{Coordinate, CoordinateError, NormalizedCoordinate};
pub use error::SummaryError;
pub use handler::{CoordinateSummaryHandler, RequestContext};
pub use model::{Address, LocationRecord, SummaryResponse, WeatherSnapshot};
pub use provider::{LocationProvider, ProviderId, WeatherProvider};
pub use summary::{Observation, SummaryService};
