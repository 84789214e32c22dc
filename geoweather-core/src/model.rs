use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Current conditions reported by the weather provider.
///
/// The three measurements are kept as the provider's own JSON numbers so
/// that an integer like `180` is echoed back as `180`, not `180.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature: Number,
    pub windspeed: Number,
    pub winddirection: Number,
    pub observed_at: Option<NaiveDateTime>,
}

/// Address components returned by reverse geocoding. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    pub suburb: Option<String>,
    pub county: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationRecord {
    pub address: Address,
    pub display_name: Option<String>,
}

/// The payload returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub temp: Number,
    pub windspeed: Number,
    pub winddirection: Number,
    pub country: String,
    pub city: String,
    pub district: String,
}
