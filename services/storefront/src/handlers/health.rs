use axum::{extract::State, http::StatusCode};

use crate::domain::repository::AuthPort;
use crate::state::AppState;

/// Handler for `GET /readyz`: the auth provider answers its health probe.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.auth().health().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "auth provider not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
