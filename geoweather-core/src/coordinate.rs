//! Coordinate validation and normalization.
//!
//! Raw `lat`/`lon` query values are checked for presence, parsed, range
//! checked and then rounded to three decimals. The rounded string form is
//! what goes into upstream URLs, so nearby inputs collapse onto the same
//! request and the same HTTP cache entry.

use std::fmt;

use thiserror::Error;

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Decimal places kept after normalization.
pub const PRECISION: usize = 3;

/// All variants share one client-facing message; the variant is only for logs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("Invalid or missing coordinates")]
    Missing { param: &'static str },

    #[error("Invalid or missing coordinates")]
    NotANumber { param: &'static str, raw: String },

    #[error("Invalid or missing coordinates")]
    OutOfRange { param: &'static str, value: f64 },
}

impl CoordinateError {
    /// Which query parameter was rejected.
    pub fn param(&self) -> &'static str {
        match self {
            CoordinateError::Missing { param }
            | CoordinateError::NotANumber { param, .. }
            | CoordinateError::OutOfRange { param, .. } => *param,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A coordinate rounded to [`PRECISION`] decimals, kept as strings so
/// trailing zeros survive (`52.5` becomes `"52.500"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCoordinate {
    pub lat: String,
    pub lon: String,
}

impl Coordinate {
    /// Validate the raw query values.
    ///
    /// A value is missing when it is absent or blank. `"0"` is a perfectly
    /// valid coordinate and must not be confused with a missing one.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Self, CoordinateError> {
        let lat_raw = require(lat, "lat")?;
        let lon_raw = require(lon, "lon")?;

        let latitude = parse_number(lat_raw, "lat")?;
        let longitude = parse_number(lon_raw, "lon")?;

        check_range(latitude, LATITUDE_RANGE, "lat")?;
        check_range(longitude, LONGITUDE_RANGE, "lon")?;

        Ok(Self { latitude, longitude })
    }

    pub fn normalize(&self) -> NormalizedCoordinate {
        NormalizedCoordinate {
            lat: round_to_string(self.latitude),
            lon: round_to_string(self.longitude),
        }
    }
}

impl fmt::Display for NormalizedCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

fn require<'a>(raw: Option<&'a str>, param: &'static str) -> Result<&'a str, CoordinateError> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CoordinateError::Missing { param }),
    }
}

fn parse_number(raw: &str, param: &'static str) -> Result<f64, CoordinateError> {
    // `f64::from_str` accepts "NaN" and "inf"; neither is a coordinate.
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoordinateError::NotANumber { param, raw: raw.to_string() })
}

fn check_range(value: f64, (min, max): (f64, f64), param: &'static str) -> Result<(), CoordinateError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CoordinateError::OutOfRange { param, value })
    }
}

/// Round half away from zero, like JavaScript's `toFixed(3)`.
///
/// `format!` rounds exact ties to even. A double sits exactly halfway
/// between two thousandths only when it is an odd multiple of 1/16
/// (`j / 16 * 1000 = j * 62.5`), and those are handled separately.
fn round_to_string(value: f64) -> String {
    // Fold -0.0 into 0.0 so it prints without a sign.
    let value = if value == 0.0 { 0.0 } else { value };

    let sixteenths = value * 16.0;
    let value = if sixteenths.fract() == 0.0 && sixteenths % 2.0 != 0.0 {
        // `value * 1000` is exact here and `f64::round` rounds half away from zero.
        (value * 1000.0).round() / 1000.0
    } else {
        value
    };

    format!("{:.*}", PRECISION, value)
}
