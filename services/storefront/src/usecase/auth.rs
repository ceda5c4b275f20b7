use crate::domain::repository::AuthPort;
use crate::domain::types::{Session, SignUpOutcome};
use crate::error::StorefrontError;

// ── SignUp ───────────────────────────────────────────────────────────────────

pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

pub struct SignUpUseCase<A: AuthPort> {
    pub auth: A,
}

impl<A: AuthPort> SignUpUseCase<A> {
    /// The provider creates the profile row from the `full_name` metadata.
    pub async fn execute(&self, input: SignUpInput) -> Result<SignUpOutcome, StorefrontError> {
        let outcome = self
            .auth
            .sign_up(
                input.email.trim(),
                &input.password,
                input.full_name.trim(),
            )
            .await?;
        tracing::info!(
            user_id = %outcome.user.id,
            confirmed = outcome.session.is_some(),
            "account created"
        );
        Ok(outcome)
    }
}

// ── SignIn ───────────────────────────────────────────────────────────────────

pub struct SignInUseCase<A: AuthPort> {
    pub auth: A,
}

impl<A: AuthPort> SignInUseCase<A> {
    pub async fn execute(&self, email: &str, password: &str) -> Result<Session, StorefrontError> {
        let session = self
            .auth
            .sign_in_with_password(email.trim(), password)
            .await?;
        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }
}

// ── SignOut ──────────────────────────────────────────────────────────────────

pub struct SignOutUseCase<A: AuthPort> {
    pub auth: A,
}

impl<A: AuthPort> SignOutUseCase<A> {
    /// Best effort: the cookies are dropped regardless, so a provider failure
    /// is only logged.
    pub async fn execute(&self, access_token: Option<&str>) {
        let Some(token) = access_token else {
            return;
        };
        if let Err(e) = self.auth.sign_out(token).await {
            tracing::warn!(error = %e, "provider sign-out failed");
        }
    }
}
