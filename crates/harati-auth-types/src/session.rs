//! Session tokens carried in request cookies.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum_extra::extract::CookieJar;
use http::request::Parts;

use crate::cookie::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};

/// Raw session tokens read from the request, plus the jar they came from.
///
/// Never rejects: a request without cookies is an anonymous visitor. Empty
/// cookie values (left behind by a cleared session) count as absent.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub jar: CookieJar,
}

impl SessionCookies {
    pub fn from_jar(jar: CookieJar) -> Self {
        let read = |name: &str| {
            jar.get(name)
                .map(|c| c.value().to_owned())
                .filter(|v| !v.is_empty())
        };
        let access_token = read(ACCESS_TOKEN_COOKIE);
        let refresh_token = read(REFRESH_TOKEN_COOKIE);
        Self {
            access_token,
            refresh_token,
            jar,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

impl<S> FromRequestParts<S> for SessionCookies
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    // Read the headers synchronously and return a 'static future; `async fn`
    // would capture the `parts` lifetime.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let jar = CookieJar::from_headers(&parts.headers);
        async move { Ok(Self::from_jar(jar)) }
    }
}
