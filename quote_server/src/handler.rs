//! Inbound HTTP surface.
//!
//! `GET /quote` derives a request-scoped deadline, runs the orchestration in its own
//! task and answers with either `{"bid": …}` or `{"error": …}` at the status the error
//! taxonomy assigns. `GET /quote/{id}` returns a stored quote.
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info, warn};
use quote_common::model::{BidResponse, ErrorBody, Quote};
use quote_common::net::QUOTE_ROUTE;
use quote_common::{AppError, Deadline};
use tokio::task::JoinError;

use crate::service::QuoteService;

/// Message returned for failures that were never classified.
pub const GENERIC_ERROR: &str = "Internal server error";

/// State shared by the handlers.
#[derive(Clone)]
pub struct AppState {
    /// Orchestration behind the routes.
    pub service: Arc<QuoteService>,
    /// Deadline granted to each request, independent of the caller.
    pub request_timeout: Duration,
}

/// Build the router serving the quote routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(QUOTE_ROUTE, get(get_quote))
        .route(&format!("{}/{{id}}", QUOTE_ROUTE), get(get_quote_by_id))
        .with_state(state)
}

/// Failure leaving a handler.
#[derive(Debug)]
pub enum ApiError {
    /// Classified failure; its message is safe to show.
    App(AppError),
    /// Anything else; only a generic message is shown.
    Unclassified(String),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Unclassified(err.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::App(AppError::validation(format!(
            "invalid quote id: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::App(err) => {
                warn!("Request failed: {}", err.detailed());
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, err.message().to_string())
            }
            ApiError::Unclassified(detail) => {
                error!("Request failed with unclassified error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR.to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

async fn get_quote(State(state): State<AppState>) -> Result<Json<BidResponse>, ApiError> {
    let deadline = Deadline::after(state.request_timeout);
    let service = Arc::clone(&state.service);
    let bid = tokio::spawn(async move { service.get_bid(&deadline).await }).await??;
    info!("Relayed bid {}", bid);
    Ok(Json(BidResponse { bid }))
}

async fn get_quote_by_id(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Quote>, ApiError> {
    let Path(id) = id?;
    let deadline = Deadline::after(state.request_timeout);
    let quote = state.service.find_quote(&deadline, id).await?;
    Ok(Json(quote))
}
