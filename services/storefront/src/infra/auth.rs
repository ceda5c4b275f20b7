use anyhow::Context as _;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use harati_domain::id::UserId;

use crate::domain::repository::AuthPort;
use crate::domain::types::{AuthUser, Session, SignUpOutcome};
use crate::error::StorefrontError;
use crate::infra::supabase::{SupabaseClient, check};

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

impl From<WireUser> for AuthUser {
    fn from(u: WireUser) -> Self {
        Self {
            id: u.id,
            email: u.email.filter(|e| !e.is_empty()),
            full_name: u
                .user_metadata
                .and_then(|m| m.full_name)
                .filter(|n| !n.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSession {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: u64,
    user: WireUser,
}

impl From<WireSession> for Session {
    fn from(s: WireSession) -> Self {
        Self {
            access_token: s.access_token,
            refresh_token: s.refresh_token,
            expires_in: s.expires_in,
            user: s.user.into(),
        }
    }
}

/// Sign-up answers with a full session when auto-confirm is on and with the
/// bare user while confirmation is pending.
fn sign_up_outcome(body: Value) -> Result<SignUpOutcome, StorefrontError> {
    if body.get("access_token").is_some() {
        let session: Session = serde_json::from_value::<WireSession>(body)
            .context("decode sign-up session")?
            .into();
        return Ok(SignUpOutcome {
            user: session.user.clone(),
            session: Some(session),
        });
    }
    let user = body.get("user").cloned().unwrap_or(body);
    let user: AuthUser = serde_json::from_value::<WireUser>(user)
        .context("decode sign-up user")?
        .into();
    Ok(SignUpOutcome {
        user,
        session: None,
    })
}

// ── Auth facade ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct SupabaseAuth {
    pub client: SupabaseClient,
}

impl SupabaseAuth {
    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<Session, StorefrontError> {
        let mut url = self.client.endpoint("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        let resp = self
            .client
            .request(Method::POST, url, None)
            .json(&body)
            .send()
            .await
            .context("send token grant")?;
        let session = check(resp)
            .await?
            .json::<WireSession>()
            .await
            .context("decode token grant")?;
        Ok(session.into())
    }
}

impl AuthPort for SupabaseAuth {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpOutcome, StorefrontError> {
        let url = self.client.endpoint("/auth/v1/signup")?;
        let resp = self
            .client
            .request(Method::POST, url, None)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .send()
            .await
            .context("send sign-up")?;
        let body = check(resp)
            .await?
            .json::<Value>()
            .await
            .context("decode sign-up")?;
        sign_up_outcome(body)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, StorefrontError> {
        self.token_grant(
            "password",
            json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, StorefrontError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, StorefrontError> {
        let url = self.client.endpoint("/auth/v1/user")?;
        let resp = self
            .client
            .request(Method::GET, url, Some(access_token))
            .send()
            .await
            .context("send get user")?;
        if matches!(resp.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(None);
        }
        let user = check(resp)
            .await?
            .json::<WireUser>()
            .await
            .context("decode user")?;
        Ok(Some(user.into()))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), StorefrontError> {
        let url = self.client.endpoint("/auth/v1/logout")?;
        let resp = self
            .client
            .request(Method::POST, url, Some(access_token))
            .send()
            .await
            .context("send sign-out")?;
        check(resp).await?;
        Ok(())
    }

    async fn health(&self) -> Result<(), StorefrontError> {
        let url = self.client.endpoint("/auth/v1/health")?;
        let resp = self
            .client
            .request(Method::GET, url, None)
            .send()
            .await
            .context("send auth health")?;
        check(resp).await?;
        Ok(())
    }
}
