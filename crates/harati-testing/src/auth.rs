//! Session helpers for integration tests.
//!
//! Tokens are signed with the same HS256 secret the service under test is
//! configured with, exactly like the hosted auth provider would sign them.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderValue;
use uuid::Uuid;

use harati_auth_types::cookie::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use harati_auth_types::token::{AUTHENTICATED_AUDIENCE, AccessClaims, issue_access_token};

/// JWT secret shared by the mock backend and the service under test.
pub const TEST_JWT_SECRET: &str = "harati-test-jwt-secret-0123456789";

/// Anon key the mock backend expects in the `apikey` header.
pub const TEST_ANON_KEY: &str = "harati-test-anon-key";

/// Access-token lifetime handed out by the mock backend.
pub const ACCESS_TOKEN_TTL: u64 = 3600;

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Sign an access token for `user_id` expiring at `exp`.
pub fn mint_access_token(user_id: Uuid, email: Option<&str>, exp: u64) -> String {
    issue_access_token(
        &AccessClaims {
            sub: user_id.to_string(),
            email: email.map(str::to_owned),
            aud: AUTHENTICATED_AUDIENCE.to_owned(),
            exp,
        },
        TEST_JWT_SECRET,
    )
}

/// Token pair as stored in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSession {
    pub access_token: String,
    pub refresh_token: String,
}

impl TestSession {
    /// `Cookie` request header carrying both tokens.
    pub fn cookie_header(&self) -> HeaderValue {
        HeaderValue::from_str(&format!(
            "{ACCESS_TOKEN_COOKIE}={}; {REFRESH_TOKEN_COOKIE}={}",
            self.access_token, self.refresh_token
        ))
        .unwrap()
    }
}
