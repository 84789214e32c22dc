//! Fan-out to both providers and merge their answers into a [`SummaryResponse`].

use std::sync::Arc;

use crate::{
    coordinate::NormalizedCoordinate,
    error::SummaryError,
    model::{LocationRecord, SummaryResponse, WeatherSnapshot},
    provider::{LocationProvider, WeatherProvider},
};

pub const UNKNOWN: &str = "Unknown";

/// First present, non-empty candidate, or [`UNKNOWN`].
pub fn resolve_field(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .find(|value| !value.is_empty())
        .map_or_else(|| UNKNOWN.to_string(), |value| value.to_string())
}

pub fn summarize(weather: WeatherSnapshot, location: LocationRecord) -> SummaryResponse {
    let addr = &location.address;

    SummaryResponse {
        temp: weather.temperature,
        windspeed: weather.windspeed,
        winddirection: weather.winddirection,
        country: resolve_field(&[addr.country.as_deref()]),
        city: resolve_field(&[addr.city.as_deref(), addr.town.as_deref(), addr.village.as_deref()]),
        district: resolve_field(&[
            addr.suburb.as_deref(),
            addr.county.as_deref(),
            addr.region.as_deref(),
        ]),
    }
}

/// Both provider answers for one coordinate, before reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub weather: WeatherSnapshot,
    pub location: LocationRecord,
}

impl Observation {
    pub fn summary(&self) -> SummaryResponse {
        summarize(self.weather.clone(), self.location.clone())
    }
}

#[derive(Debug, Clone)]
pub struct SummaryService {
    weather: Arc<dyn WeatherProvider>,
    location: Arc<dyn LocationProvider>,
}

impl SummaryService {
    pub fn new(weather: Arc<dyn WeatherProvider>, location: Arc<dyn LocationProvider>) -> Self {
        Self { weather, location }
    }

    /// Query both providers concurrently.
    ///
    /// Either provider failing fails the whole observation; no partial data is returned.
    pub async fn observe(&self, coord: &NormalizedCoordinate) -> Result<Observation, SummaryError> {
        let weather = async {
            self.weather
                .current_weather(coord)
                .await
                .map_err(|e| SummaryError::upstream(self.weather.id(), e))
        };
        let location = async {
            self.location
                .reverse_geocode(coord)
                .await
                .map_err(|e| SummaryError::upstream(self.location.id(), e))
        };

        let (weather, location) = tokio::try_join!(weather, location)?;

        if let Some(observed_at) = weather.observed_at {
            tracing::debug!(%coord, %observed_at, "weather observation time");
        }

        Ok(Observation { weather, location })
    }

    pub async fn summary_for(&self, coord: &NormalizedCoordinate) -> Result<SummaryResponse, SummaryError> {
        let Observation { weather, location } = self.observe(coord).await?;
        Ok(summarize(weather, location))
    }
}
