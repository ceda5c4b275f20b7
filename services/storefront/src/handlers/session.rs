//! Session extractors.
//!
//! Each extractor resolves the cookie session once and hands the (possibly
//! updated) cookie jar to the handler, which returns it with the response so
//! refreshed or cleared cookies reach the browser.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use harati_auth_types::cookie::{clear_session_cookies, set_session_cookies};
use harati_auth_types::session::SessionCookies;

use crate::domain::types::SignedIn;
use crate::state::AppState;
use crate::usecase::session::{GetProfileUseCase, ResolveSessionUseCase};

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Optional viewer. Never rejects.
pub struct CurrentSession {
    pub viewer: Option<SignedIn>,
    pub jar: CookieJar,
}

/// A signed-in viewer. Anonymous visitors are sent to the login page.
pub struct Viewer {
    pub signed_in: SignedIn,
    pub jar: CookieJar,
}

/// A signed-in owner. Consumers are sent to the dashboard.
pub struct Owner {
    pub signed_in: SignedIn,
    pub jar: CookieJar,
}

/// `303 See Other` to a gate page, carrying any cookie changes.
#[derive(Debug)]
pub struct GateRedirect {
    pub jar: CookieJar,
    pub to: &'static str,
}

impl IntoResponse for GateRedirect {
    fn into_response(self) -> Response {
        (self.jar, Redirect::to(self.to)).into_response()
    }
}

async fn resolve(state: AppState, cookies: SessionCookies) -> CurrentSession {
    let SessionCookies {
        access_token,
        refresh_token,
        jar,
    } = cookies;

    let usecase = ResolveSessionUseCase {
        auth: state.auth(),
        jwt_secret: state.config.supabase_jwt_secret.clone(),
    };
    let resolution = match usecase
        .execute(access_token.as_deref(), refresh_token.as_deref())
        .await
    {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::warn!(error = %e, "session lookup failed, treating visitor as anonymous");
            return CurrentSession { viewer: None, jar };
        }
    };

    let domain = state.cookie_domain();
    let jar = if let Some(session) = resolution.refreshed {
        tracing::debug!(user_id = %session.user.id, "session refreshed");
        set_session_cookies(jar, session.access_token, session.refresh_token, domain)
    } else if resolution.stale {
        clear_session_cookies(jar, domain)
    } else {
        jar
    };
    CurrentSession {
        viewer: resolution.viewer,
        jar,
    }
}

async fn require_owner(state: AppState, viewer: Viewer) -> Result<Owner, GateRedirect> {
    let Viewer { signed_in, jar } = viewer;
    let usecase = GetProfileUseCase {
        repo: state.profile_repo(Some(&signed_in.access_token)),
    };
    match usecase.is_owner(signed_in.user.id).await {
        Ok(true) => Ok(Owner { signed_in, jar }),
        Ok(false) => Err(GateRedirect {
            jar,
            to: DASHBOARD_PATH,
        }),
        Err(e) => {
            tracing::warn!(user_id = %signed_in.user.id, error = %e, "owner check failed");
            Err(GateRedirect {
                jar,
                to: DASHBOARD_PATH,
            })
        }
    }
}

// axum-core 0.5 declares `from_request_parts` as `fn -> impl Future + Send`;
// read the cookies synchronously and move owned values into the future.

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let cookies = SessionCookies::from_jar(CookieJar::from_headers(&parts.headers));
        let state = state.clone();
        async move { Ok(resolve(state, cookies).await) }
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = GateRedirect;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let cookies = SessionCookies::from_jar(CookieJar::from_headers(&parts.headers));
        let state = state.clone();
        async move {
            let CurrentSession { viewer, jar } = resolve(state, cookies).await;
            match viewer {
                Some(signed_in) => Ok(Viewer { signed_in, jar }),
                None => Err(GateRedirect {
                    jar,
                    to: LOGIN_PATH,
                }),
            }
        }
    }
}

impl FromRequestParts<AppState> for Owner {
    type Rejection = GateRedirect;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let cookies = SessionCookies::from_jar(CookieJar::from_headers(&parts.headers));
        let state = state.clone();
        async move {
            let CurrentSession { viewer, jar } = resolve(state.clone(), cookies).await;
            let Some(signed_in) = viewer else {
                return Err(GateRedirect {
                    jar,
                    to: LOGIN_PATH,
                });
            };
            require_owner(state, Viewer { signed_in, jar }).await
        }
    }
}
