use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use harati_auth_types::cookie::{clear_session_cookies, set_session_cookies};
use harati_auth_types::session::SessionCookies;

use crate::error::StorefrontError;
use crate::handlers::session::{CurrentSession, DASHBOARD_PATH};
use crate::state::AppState;
use crate::usecase::auth::{SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase};

/// Page model for the sign-up and sign-in forms.
#[derive(Debug, Serialize)]
pub struct AuthFormPage {
    pub title: &'static str,
    pub action: &'static str,
    pub fields: &'static [&'static str],
    pub password_min_length: u8,
    pub alternate: &'static str,
}

const PASSWORD_MIN_LENGTH: u8 = 6;

fn form_page(session: CurrentSession, page: AuthFormPage) -> Response {
    if session.viewer.is_some() {
        return (session.jar, Redirect::to(DASHBOARD_PATH)).into_response();
    }
    (session.jar, Json(page)).into_response()
}

// ── GET /signup ──────────────────────────────────────────────────────────────

pub async fn signup_page(session: CurrentSession) -> Response {
    form_page(
        session,
        AuthFormPage {
            title: "Create Account",
            action: "/signup",
            fields: &["full_name", "email", "password"],
            password_min_length: PASSWORD_MIN_LENGTH,
            alternate: "/login",
        },
    )
}

// ── GET /login ───────────────────────────────────────────────────────────────

pub async fn login_page(session: CurrentSession) -> Response {
    form_page(
        session,
        AuthFormPage {
            title: "Sign In",
            action: "/login",
            fields: &["email", "password"],
            password_min_length: PASSWORD_MIN_LENGTH,
            alternate: "/signup",
        },
    )
}

// ── POST /signup ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignUpForm>,
) -> Result<(CookieJar, Redirect), StorefrontError> {
    let usecase = SignUpUseCase { auth: state.auth() };
    let outcome = usecase
        .execute(SignUpInput {
            email: form.email,
            password: form.password,
            full_name: form.full_name,
        })
        .await?;
    let jar = match outcome.session {
        Some(session) => set_session_cookies(
            jar,
            session.access_token,
            session.refresh_token,
            state.cookie_domain(),
        ),
        None => jar,
    };
    Ok((jar, Redirect::to(DASHBOARD_PATH)))
}

// ── POST /login ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), StorefrontError> {
    let usecase = SignInUseCase { auth: state.auth() };
    let session = usecase.execute(&form.email, &form.password).await?;
    let jar = set_session_cookies(
        jar,
        session.access_token,
        session.refresh_token,
        state.cookie_domain(),
    );
    Ok((jar, Redirect::to(DASHBOARD_PATH)))
}

// ── POST /logout ─────────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    cookies: SessionCookies,
) -> (CookieJar, Redirect) {
    let usecase = SignOutUseCase { auth: state.auth() };
    usecase.execute(cookies.access_token.as_deref()).await;
    let jar = clear_session_cookies(cookies.jar, state.cookie_domain());
    (jar, Redirect::to("/"))
}
