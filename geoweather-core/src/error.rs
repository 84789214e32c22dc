use thiserror::Error;

use crate::{coordinate::CoordinateError, provider::ProviderId};

/// Message returned to clients when a provider call fails.
pub const UPSTREAM_ERROR_MESSAGE: &str = "Upstream provider request failed";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error(transparent)]
    InvalidCoordinates(#[from] CoordinateError),

    #[error("{provider} request failed: {cause:#}")]
    Upstream {
        provider: ProviderId,
        cause: anyhow::Error,
    },
}

impl SummaryError {
    pub fn upstream(provider: ProviderId, cause: anyhow::Error) -> Self {
        SummaryError::Upstream { provider, cause }
    }

    /// The stable message safe to show to API clients.
    pub fn public_message(&self) -> String {
        match self {
            SummaryError::InvalidCoordinates(err) => err.to_string(),
            SummaryError::Upstream { .. } => UPSTREAM_ERROR_MESSAGE.to_string(),
        }
    }
}
