//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::warn;

use crate::domain::{ArrivalFilter, StopCode, known_stops};
use crate::luas::LuasError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sensors", get(list_sensors))
        .route("/sensors/:id", get(get_sensor))
        .route("/stops", get(list_stops))
        .route("/forecast/:stop", get(get_forecast))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every configured sensor.
async fn list_sensors(State(state): State<AppState>) -> Json<SensorsResponse> {
    let sensors = state
        .poller
        .all()
        .await
        .into_iter()
        .map(SensorResponse::from)
        .collect();

    Json(SensorsResponse { sensors })
}

/// One sensor by id.
async fn get_sensor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SensorResponse>, AppError> {
    let sensor = state.poller.get(&id).await.ok_or_else(|| AppError::NotFound {
        message: format!("No sensor with id {id}"),
    })?;

    Ok(Json(SensorResponse::from(sensor)))
}

/// Known stop codes and names.
async fn list_stops() -> Json<StopsResponse> {
    let stops = known_stops()
        .map(|(code, name)| StopResult::new(&code, name))
        .collect();

    Json(StopsResponse { stops })
}

/// Live forecast for a stop, optionally filtered.
async fn get_forecast(
    State(state): State<AppState>,
    Path(stop): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, AppError> {
    let stop = StopCode::parse(&stop).map_err(|e| AppError::BadRequest {
        message: format!("{e}: {stop:?}"),
    })?;

    let forecast = state.client.get_forecast(&stop).await.map_err(|e| {
        let err = AppError::from(e);
        match err {
            AppError::NotFound { .. } => AppError::NotFound {
                message: format!("Unknown stop {stop}"),
            },
            other => other,
        }
    })?;

    let filter = ArrivalFilter::new(query.direction.as_deref(), query.destination.as_deref());
    let selection = filter.apply(&forecast.arrivals);

    Ok(Json(ForecastResponse::new(&forecast, &selection)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    GatewayTimeout { message: String },
    Internal { message: String },
}

impl From<LuasError> for AppError {
    fn from(e: LuasError) -> Self {
        let message = e.to_string();
        match e {
            e if e.is_unknown_stop() => AppError::NotFound { message },
            LuasError::Parse(_) => AppError::BadGateway { message },
            LuasError::Communication(c) if c.is_timeout() => AppError::GatewayTimeout { message },
            LuasError::Communication(_) => AppError::BadGateway { message },
            LuasError::NotConfigured(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::GatewayTimeout { message } => (StatusCode::GATEWAY_TIMEOUT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, "{message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
