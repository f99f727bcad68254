//! HTTP request handlers.

use super::types::{HealthResponse, RegisterResponse};
use super::AppState;
use crate::error::IntakeError;
use crate::registration::{ClientMetadata, Registration, RegistrationForm};
use crate::store::StoreError;
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::net::SocketAddr;
use tracing::{debug, info, warn};

/// Health check endpoint.
///
/// Always answers 200; the store's reachability is reported, not enforced.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.store.get().await {
        Ok(store) => match store.ping().await {
            Ok(()) => "ok",
            Err(e) => {
                warn!(error = %e, "Registration store ping failed");
                "unavailable"
            }
        },
        Err(StoreError::NotConfigured) => "unconfigured",
        Err(e) => {
            warn!(error = %e, "Registration store unavailable");
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        database: database.to_string(),
    })
}

/// Accept a professional pre-registration.
///
/// The body is read raw so that malformed JSON surfaces as a missing-field
/// validation error rather than an extractor rejection.
pub async fn register(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<RegisterResponse>), IntakeError> {
    let valid = RegistrationForm::from_body(&body).validate()?;
    debug!(email = %valid.email, profession = %valid.profession, "Registration request received");

    let store = state.store.get().await?;

    // Best-effort pre-check; the unique index is the authoritative guard
    if store.email_exists(&valid.email).await? {
        return Err(IntakeError::DuplicateEmail(valid.email));
    }

    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let metadata = ClientMetadata::from_request(&headers, peer);
    let registration = Registration::new(valid, metadata);

    let id = store.insert(&registration).await?;

    info!(
        id = %id,
        ip = %registration.client_ip,
        "New pre-registration: {} <{}> - {}{}",
        registration.name,
        registration.email,
        registration.profession,
        registration.specialties_suffix()
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse::created(id, &registration)),
    ))
}

/// Any verb other than POST (preflight is answered by the CORS layer).
pub async fn method_not_allowed() -> IntakeError {
    IntakeError::MethodNotAllowed
}
