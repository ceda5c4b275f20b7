//! Cookie builders for the provider session (access + refresh token).

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

/// Cookie name for the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// Cookie Max-Age for both tokens in seconds (7 days).
///
/// The access token itself expires much sooner; an expired token is refreshed
/// on the next request as long as the refresh cookie is still present.
pub const SESSION_COOKIE_MAX_AGE: i64 = 604800;

fn base(
    name: &'static str,
    value: String,
    max_age: Duration,
    domain: Option<&str>,
) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build();
    if let Some(d) = domain {
        cookie.set_domain(d.to_owned());
    }
    cookie
}

/// Store both session tokens on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use harati_auth_types::cookie::{set_session_cookies, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
///
/// let jar = set_session_cookies(CookieJar::new(), "a".into(), "r".into(), Some("example.com"));
/// let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
/// assert_eq!(access.value(), "a");
/// assert_eq!(access.path(), Some("/"));
/// assert_eq!(access.domain(), Some("example.com"));
/// assert!(access.http_only().unwrap_or(false));
/// assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).unwrap().value(), "r");
/// ```
pub fn set_session_cookies(
    jar: CookieJar,
    access_token: String,
    refresh_token: String,
    domain: Option<&str>,
) -> CookieJar {
    let max_age = Duration::seconds(SESSION_COOKIE_MAX_AGE);
    let access = base(ACCESS_TOKEN_COOKIE, access_token, max_age, domain);
    let refresh = base(REFRESH_TOKEN_COOKIE, refresh_token, max_age, domain);
    jar.add(access).add(refresh)
}

/// Clear both session cookies by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use harati_auth_types::cookie::{clear_session_cookies, set_session_cookies, ACCESS_TOKEN_COOKIE};
///
/// let jar = set_session_cookies(CookieJar::new(), "a".into(), "r".into(), None);
/// let jar = clear_session_cookies(jar, None);
/// let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
/// assert_eq!(access.value(), "");
/// assert_eq!(access.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookies(jar: CookieJar, domain: Option<&str>) -> CookieJar {
    let access = base(ACCESS_TOKEN_COOKIE, String::new(), Duration::ZERO, domain);
    let refresh = base(REFRESH_TOKEN_COOKIE, String::new(), Duration::ZERO, domain);
    jar.add(access).add(refresh)
}
