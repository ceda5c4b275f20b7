//! Local inspection of provider-issued access tokens.
//!
//! The hosted auth provider signs access tokens with the project JWT secret
//! (HS256). Inspecting them locally tells an expired session (refreshable) apart
//! from a forged or malformed one without a network round-trip. Identity is still
//! confirmed with the provider afterwards.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "issuer", test))]
use serde::Serialize;
use uuid::Uuid;

/// Audience the provider stamps on signed-in user tokens.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Errors returned by [`inspect_access_token`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// Access-token claims used by this service.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | auth user id (UUID string) |
/// | `email` | custom | account e-mail, absent for phone sign-ups |
/// | `aud` | `aud` | always `"authenticated"` for user sessions |
/// | `exp` | `exp` | seconds since UNIX epoch |
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "issuer", test), derive(Serialize))]
pub struct AccessClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub aud: String,
    pub exp: u64,
}

/// Identity extracted from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub exp: u64,
}

fn validation() -> Validation {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_audience(&[AUTHENTICATED_AUDIENCE]);
    validation.set_required_spec_claims(&["exp", "sub", "aud"]);
    validation
}

/// Verify signature, audience and expiry, returning the token's identity.
///
/// Default leeway is 60s to tolerate clock skew against the provider.
pub fn inspect_access_token(token: &str, secret: &str) -> Result<TokenInfo, TokenError> {
    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    let user_id = data
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        email: data.claims.email,
        exp: data.claims.exp,
    })
}

/// Sign claims the way the provider does. Test tooling only.
#[cfg(any(feature = "issuer", test))]
pub fn issue_access_token(claims: &AccessClaims, secret: &str) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("HS256 encoding with a byte secret cannot fail")
}
