use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{self, Path},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use registration_schema::payloads::{HealthResponse, RegisterResponse, StatusResponse};
use tracing::{info, warn};

use crate::{error::AppError, state::State, utils::get_registration_from_body};

pub async fn register_handler(
    extract::State(state): extract::State<Arc<State>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let insert = get_registration_from_body(&body).inspect_err(|e| {
        if let AppError::Validation(errors) = e {
            warn!("Registration rejected, {} invalid field(s)", errors.len());
        }
    })?;

    let registration = state.storage.register(insert).await.inspect_err(|e| {
        warn!("Registration rejected: {e}");
    })?;

    info!("Registration {} stored", registration.id);

    state.log_to_sheet(&registration);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse::new(&registration)),
    ))
}

pub async fn status_handler(
    extract::State(state): extract::State<Arc<State>>,
    Path(email): Path<String>,
) -> impl IntoResponse {
    let registration = state.storage.get_registration_by_email(&email).await;

    Json(StatusResponse::new(registration.as_ref()))
}

pub async fn stats_handler(extract::State(state): extract::State<Arc<State>>) -> impl IntoResponse {
    Json(state.storage.stats().await)
}

pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        message: "Tech For Girls Registration API is running!".to_string(),
        timestamp: Utc::now(),
    })
}
