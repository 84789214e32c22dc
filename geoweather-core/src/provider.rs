use crate::{
    Config, LocationRecord, NormalizedCoordinate, WeatherSnapshot,
    provider::{nominatim::NominatimProvider, openmeteo::OpenMeteoProvider},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use std::{fmt::Debug, sync::Arc};

pub mod nominatim;
pub mod openmeteo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenMeteo,
    Nominatim,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenMeteo => "open-meteo",
            ProviderId::Nominatim => "nominatim",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of current weather conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn current_weather(&self, coord: &NormalizedCoordinate) -> anyhow::Result<WeatherSnapshot>;
}

/// Source of address information for a coordinate.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn reverse_geocode(&self, coord: &NormalizedCoordinate) -> anyhow::Result<LocationRecord>;
}

/// Construct both upstream providers from config.
pub fn providers_from_config(
    config: &Config,
) -> anyhow::Result<(Arc<dyn WeatherProvider>, Arc<dyn LocationProvider>)> {
    let weather = OpenMeteoProvider::new(&config.providers.weather_base_url, config.request_timeout())?;
    let location = NominatimProvider::new(
        &config.providers.location_base_url,
        &config.user_agent,
        config.request_timeout(),
    )?;

    Ok((Arc::new(weather), Arc::new(location)))
}

pub(crate) fn checked_base_url(base_url: &str) -> anyhow::Result<String> {
    Url::parse(base_url).with_context(|| format!("Invalid base URL '{base_url}'"))?;
    Ok(base_url.trim_end_matches('/').to_string())
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
