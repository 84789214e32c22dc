use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    coordinate::NormalizedCoordinate,
    model::{Address, LocationRecord},
};

use super::{LocationProvider, ProviderId, checked_base_url, truncate_body};

#[derive(Debug, Clone)]
pub struct NominatimProvider {
    base_url: String,
    http: Client,
}

impl NominatimProvider {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build Nominatim HTTP client")?;

        Ok(Self { base_url: checked_base_url(base_url)?, http })
    }
}

/// `<base>/reverse?format=json&lat=<lat>&lon=<lon>`
pub fn reverse_url(base_url: &str, coord: &NormalizedCoordinate) -> String {
    format!(
        "{}/reverse?format=json&lat={}&lon={}",
        base_url.trim_end_matches('/'),
        coord.lat,
        coord.lon,
    )
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<Address>,
    display_name: Option<String>,
    // Nominatim answers 200 with {"error": "..."} for points it cannot geocode.
    error: Option<String>,
}

#[async_trait]
impl LocationProvider for NominatimProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Nominatim
    }

    async fn reverse_geocode(&self, coord: &NormalizedCoordinate) -> Result<LocationRecord> {
        let url = reverse_url(&self.base_url, coord);
        tracing::debug!(%url, "requesting reverse geocode");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to Nominatim")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Nominatim response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Nominatim request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: NominatimResponse =
            serde_json::from_str(&body).context("Failed to parse Nominatim JSON")?;

        let address = match (parsed.address, parsed.error) {
            (Some(address), _) => address,
            (None, Some(reason)) => return Err(anyhow!("Nominatim could not geocode: {reason}")),
            (None, None) => return Err(anyhow!("Nominatim response contained no address")),
        };

        Ok(LocationRecord { address, display_name: parsed.display_name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn coord(lat: &str, lon: &str) -> NormalizedCoordinate {
        NormalizedCoordinate { lat: lat.into(), lon: lon.into() }
    }

    fn provider(server: &MockServer) -> NominatimProvider {
        NominatimProvider::new(&server.uri(), "WeatherApp", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn reverse_url_uses_normalized_strings_verbatim() {
        let url = reverse_url("https://nominatim.openstreetmap.org", &coord("52.500", "-0.100"));
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/reverse?format=json&lat=52.500&lon=-0.100"
        );
    }

    #[tokio::test]
    async fn sends_user_agent_and_parses_address() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("format", "json"))
            .and(query_param("lat", "52.520"))
            .and(query_param("lon", "13.405"))
            .and(header("User-Agent", "WeatherApp"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "place_id": 1,
                "display_name": "Mitte, Berlin, Germany",
                "address": {
                    "suburb": "Mitte",
                    "city": "Berlin",
                    "country": "Germany",
                    "country_code": "de"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = provider(&server)
            .reverse_geocode(&coord("52.520", "13.405"))
            .await
            .unwrap();

        assert_eq!(record.address.suburb.as_deref(), Some("Mitte"));
        assert_eq!(record.address.city.as_deref(), Some("Berlin"));
        assert_eq!(record.address.country.as_deref(), Some("Germany"));
        assert_eq!(record.address.town, None);
        assert_eq!(record.display_name.as_deref(), Some("Mitte, Berlin, Germany"));
    }

    #[tokio::test]
    async fn geocode_error_body_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "Unable to geocode"
            })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .reverse_geocode(&coord("0.000", "0.000"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Unable to geocode"));
    }

    #[tokio::test]
    async fn missing_address_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = provider(&server)
            .reverse_geocode(&coord("1.000", "1.000"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("no address"));
    }

    #[tokio::test]
    async fn forbidden_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Access blocked"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .reverse_geocode(&coord("1.000", "1.000"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("403"));
    }
}
