//! The coordinate summary request handler.
//!
//! The handler never touches the HTTP framework directly. It reads query
//! parameters from and writes response headers to a [`RequestContext`] that
//! the caller builds per request and passes in.

use axum::http::header::{CACHE_CONTROL, HeaderMap, HeaderName, HeaderValue};

use crate::{
    coordinate::Coordinate,
    error::SummaryError,
    model::SummaryResponse,
    summary::SummaryService,
};

/// Per-request view of the inbound query and the outbound headers.
#[derive(Debug, Default)]
pub struct RequestContext {
    query: Vec<(String, String)>,
    headers: HeaderMap,
}

impl RequestContext {
    pub fn new(query: Vec<(String, String)>) -> Self {
        Self { query, headers: HeaderMap::new() }
    }

    /// First value for `name`, like `URLSearchParams::get`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn into_headers(self) -> HeaderMap {
        self.headers
    }
}

#[derive(Debug, Clone)]
pub struct CoordinateSummaryHandler {
    service: SummaryService,
    cache_control: HeaderValue,
}

impl CoordinateSummaryHandler {
    pub fn new(service: SummaryService, cache_control: HeaderValue) -> Self {
        Self { service, cache_control }
    }

    /// Validate, normalize, fan out, merge.
    ///
    /// Validation happens before any network call. The cache directive is
    /// only set once a full summary is available, so errors are never cached.
    pub async fn handle(&self, ctx: &mut RequestContext) -> Result<SummaryResponse, SummaryError> {
        let coord = Coordinate::parse(ctx.query_param("lat"), ctx.query_param("lon"))?;
        let normalized = coord.normalize();

        let summary = self.service.summary_for(&normalized).await?;

        ctx.set_header(CACHE_CONTROL, self.cache_control.clone());
        tracing::info!(
            coord = %normalized,
            country = %summary.country,
            city = %summary.city,
            "served summary"
        );

        Ok(summary)
    }
}
