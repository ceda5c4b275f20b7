use harati_auth_types::token::{TokenError, inspect_access_token};
use harati_domain::id::UserId;
use harati_domain::profile::Profile;

use crate::domain::repository::{AuthPort, ProfileRepository};
use crate::domain::types::{Session, SignedIn};
use crate::error::StorefrontError;

// ── ResolveSession ───────────────────────────────────────────────────────────

/// Outcome of reading the session cookies.
#[derive(Debug, Default)]
pub struct SessionResolution {
    pub viewer: Option<SignedIn>,
    /// New token pair when the access token had expired and was refreshed.
    pub refreshed: Option<Session>,
    /// Cookies were present but name no live session; they should be cleared.
    pub stale: bool,
}

impl SessionResolution {
    fn stale() -> Self {
        Self {
            stale: true,
            ..Self::default()
        }
    }
}

pub struct ResolveSessionUseCase<A: AuthPort> {
    pub auth: A,
    pub jwt_secret: String,
}

impl<A: AuthPort> ResolveSessionUseCase<A> {
    /// Provider rejections (bad refresh token, revoked user) resolve to a stale
    /// anonymous session. Only transport failures are returned as errors.
    pub async fn execute(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<SessionResolution, StorefrontError> {
        let Some(access_token) = access_token else {
            return Ok(SessionResolution::default());
        };

        let (token, refreshed) = match inspect_access_token(access_token, &self.jwt_secret) {
            Ok(_) => (access_token.to_owned(), None),
            Err(TokenError::Expired) => {
                let Some(refresh_token) = refresh_token else {
                    return Ok(SessionResolution::stale());
                };
                match self.auth.refresh_session(refresh_token).await {
                    Ok(session) => (session.access_token.clone(), Some(session)),
                    Err(StorefrontError::Backend { status, message }) => {
                        tracing::debug!(status, %message, "session refresh rejected");
                        return Ok(SessionResolution::stale());
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "discarding unusable access token");
                return Ok(SessionResolution::stale());
            }
        };

        match self.auth.get_user(&token).await? {
            Some(user) => Ok(SessionResolution {
                viewer: Some(SignedIn {
                    user,
                    access_token: token,
                }),
                refreshed,
                stale: false,
            }),
            None => Ok(SessionResolution::stale()),
        }
    }
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<P: ProfileRepository> {
    pub repo: P,
}

impl<P: ProfileRepository> GetProfileUseCase<P> {
    pub async fn execute(&self, user_id: UserId) -> Result<Option<Profile>, StorefrontError> {
        self.repo.find_by_id(user_id).await
    }

    /// Owner gate. A missing profile is not an owner.
    pub async fn is_owner(&self, user_id: UserId) -> Result<bool, StorefrontError> {
        Ok(self
            .execute(user_id)
            .await?
            .is_some_and(|profile| profile.is_owner()))
    }
}
