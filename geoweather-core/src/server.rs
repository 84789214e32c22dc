//! HTTP surface: one GET endpoint in front of [`CoordinateSummaryHandler`].

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    Config,
    error::SummaryError,
    handler::{CoordinateSummaryHandler, RequestContext},
    provider::providers_from_config,
    summary::SummaryService,
};

pub const SUMMARY_PATH: &str = "/backend/api";

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<CoordinateSummaryHandler>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for SummaryError {
    fn into_response(self) -> Response {
        let status = match &self {
            SummaryError::InvalidCoordinates(err) => {
                tracing::debug!(param = err.param(), ?err, "rejected coordinates");
                StatusCode::BAD_REQUEST
            }
            SummaryError::Upstream { provider, cause } => {
                tracing::warn!(%provider, "upstream failure: {cause:#}");
                StatusCode::BAD_GATEWAY
            }
        };

        (status, Json(ErrorBody { error: self.public_message() })).into_response()
    }
}

async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, SummaryError> {
    let mut ctx = RequestContext::new(query);
    let body = state.handler.handle(&mut ctx).await?;

    Ok((StatusCode::OK, ctx.into_headers(), Json(body)).into_response())
}

pub fn router(handler: CoordinateSummaryHandler) -> Router {
    let state = AppState { handler: Arc::new(handler) };

    Router::new()
        .route(SUMMARY_PATH, get(get_summary))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub fn service_from_config(config: &Config) -> Result<SummaryService> {
    let (weather, location) = providers_from_config(config)?;
    Ok(SummaryService::new(weather, location))
}

/// Wire providers, service and handler together from config.
pub fn handler_from_config(config: &Config) -> Result<CoordinateSummaryHandler> {
    Ok(CoordinateSummaryHandler::new(
        service_from_config(config)?,
        config.cache_control_value(),
    ))
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    let addr = config.socket_addr()?;
    let app = router(handler_from_config(config)?);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("listening on http://{}{}", listener.local_addr()?, SUMMARY_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
