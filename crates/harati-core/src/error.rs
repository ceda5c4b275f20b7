use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON body every service error renders to.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope<'a> {
    pub kind: &'a str,
    pub message: &'a str,
}

/// Render an error as `{ "kind", "message" }` with the given status.
///
/// Nothing is logged here. The caller owns the underlying cause and logs it;
/// tower-http's TraceLayer already records method/uri/status per request.
pub fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    (status, axum::Json(ErrorEnvelope { kind, message })).into_response()
}
