use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Number;
use std::time::Duration;

use crate::{coordinate::NormalizedCoordinate, model::WeatherSnapshot};

use super::{ProviderId, WeatherProvider, checked_base_url, truncate_body};

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Open-Meteo HTTP client")?;

        Ok(Self { base_url: checked_base_url(base_url)?, http })
    }
}

/// `<base>/v1/forecast?latitude=<lat>&longitude=<lon>&current_weather=true`
pub fn forecast_url(base_url: &str, coord: &NormalizedCoordinate) -> String {
    format!(
        "{}/v1/forecast?latitude={}&longitude={}&current_weather=true",
        base_url.trim_end_matches('/'),
        coord.lat,
        coord.lon,
    )
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: Number,
    windspeed: Number,
    winddirection: Number,
    time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current_weather: Option<OmCurrentWeather>,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    async fn current_weather(&self, coord: &NormalizedCoordinate) -> Result<WeatherSnapshot> {
        let url = forecast_url(&self.base_url, coord);
        tracing::debug!(%url, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to Open-Meteo")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo JSON")?;

        let current = parsed
            .current_weather
            .ok_or_else(|| anyhow!("Open-Meteo response contained no current_weather"))?;

        let observed_at = current
            .time
            .as_deref()
            .and_then(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M").ok());

        Ok(WeatherSnapshot {
            temperature: current.temperature,
            windspeed: current.windspeed,
            winddirection: current.winddirection,
            observed_at,
        })
    }
}
