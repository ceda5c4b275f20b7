use axum::http::{StatusCode, header};
use serde_json::Value;

use harati_auth_types::cookie::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use harati_domain::role::Role;

use crate::helpers::{Harness, PASSWORD, location, set_cookie, set_cookies};

// ── Sign-up ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_sign_up_and_land_on_dashboard_with_session_cookies() {
    let h = Harness::start().await;

    let resp = h
        .server
        .post("/signup")
        .form(&[
            ("full_name", "  Asha Rai "),
            ("email", " asha@example.com "),
            ("password", PASSWORD),
        ])
        .await;

    assert_eq!(resp.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
    let access = set_cookie(&resp, ACCESS_TOKEN_COOKIE).expect("access cookie");
    assert!(!access.value().is_empty());
    assert_eq!(access.path(), Some("/"));
    assert!(access.http_only().unwrap_or(false));
    assert!(set_cookie(&resp, REFRESH_TOKEN_COOKIE).is_some());
}

#[tokio::test]
async fn should_not_set_cookies_when_signup_needs_confirmation() {
    let h = Harness::start().await;
    h.backend.set_autoconfirm(false);

    let resp = h
        .server
        .post("/signup")
        .form(&[("email", "new@example.com"), ("password", PASSWORD)])
        .await;

    assert_eq!(resp.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
    assert!(set_cookies(&resp).is_empty());
}

#[tokio::test]
async fn should_surface_provider_message_for_duplicate_signup() {
    let h = Harness::start().await;
    h.backend
        .add_user("taken@example.com", PASSWORD, None, Role::Consumer);

    let resp = h
        .server
        .post("/signup")
        .form(&[("email", "taken@example.com"), ("password", PASSWORD)])
        .await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    let body = resp.json::<Value>();
    assert_eq!(body["kind"], "BACKEND_ERROR");
    assert_eq!(body["message"], "User already registered");
}

#[tokio::test]
async fn should_redirect_signed_in_visitor_away_from_signup_form() {
    let h = Harness::start().await;
    let (_, session) = h.consumer();

    let resp = h
        .server
        .get("/signup")
        .add_header(header::COOKIE, session.cookie_header())
        .await;

    assert_eq!(resp.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
}

#[tokio::test]
async fn should_render_signup_form_for_anonymous_visitor() {
    let h = Harness::start().await;

    let resp = h.server.get("/signup").await;

    assert_eq!(resp.status_code(), StatusCode::OK);
    let body = resp.json::<Value>();
    assert_eq!(body["action"], "/signup");
    assert_eq!(body["password_min_length"], 6);
    assert_eq!(body["alternate"], "/login");
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_log_in_with_valid_credentials() {
    let h = Harness::start().await;
    h.backend
        .add_user("asha@example.com", PASSWORD, Some("Asha"), Role::Consumer);

    let resp = h
        .server
        .post("/login")
        .form(&[("email", "asha@example.com"), ("password", PASSWORD)])
        .await;

    assert_eq!(resp.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
    let refresh = set_cookie(&resp, REFRESH_TOKEN_COOKIE).expect("refresh cookie");
    assert!(h.backend.refresh_token_valid(refresh.value()));
}

#[tokio::test]
async fn should_reject_wrong_password_without_setting_cookies() {
    let h = Harness::start().await;
    h.backend
        .add_user("asha@example.com", PASSWORD, None, Role::Consumer);

    let resp = h
        .server
        .post("/login")
        .form(&[("email", "asha@example.com"), ("password", "nope")])
        .await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["message"], "Invalid login credentials");
    assert!(set_cookies(&resp).is_empty());
}

// ── Logout ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_log_out_and_clear_cookies() {
    let h = Harness::start().await;
    let (_, session) = h.consumer();

    let resp = h
        .server
        .post("/logout")
        .add_header(header::COOKIE, session.cookie_header())
        .await;

    assert_eq!(resp.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let access = set_cookie(&resp, ACCESS_TOKEN_COOKIE).expect("cleared access cookie");
    assert_eq!(access.value(), "");
    assert_eq!(access.max_age(), Some(time::Duration::ZERO));
    assert!(!h.backend.refresh_token_valid(&session.refresh_token));
}

#[tokio::test]
async fn should_log_out_anonymous_visitor_without_calling_provider() {
    let h = Harness::start().await;

    let resp = h.server.post("/logout").await;

    assert_eq!(resp.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert!(h.backend.calls().iter().all(|c| !c.ends_with("/logout")));
}

// ── Session refresh ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_refresh_expired_access_token_and_reissue_cookies() {
    let h = Harness::start().await;
    let id = h
        .backend
        .add_user("asha@example.com", PASSWORD, None, Role::Consumer);
    let session = h.backend.expired_session(id);

    let resp = h
        .server
        .get("/dashboard")
        .add_header(header::COOKIE, session.cookie_header())
        .await;

    assert_eq!(resp.status_code(), StatusCode::OK);
    let access = set_cookie(&resp, ACCESS_TOKEN_COOKIE).expect("new access cookie");
    assert_ne!(access.value(), session.access_token);
    let refresh = set_cookie(&resp, REFRESH_TOKEN_COOKIE).expect("new refresh cookie");
    assert_ne!(refresh.value(), session.refresh_token);
    assert!(h.backend.refresh_token_valid(refresh.value()));
    assert!(!h.backend.refresh_token_valid(&session.refresh_token));
}

#[tokio::test]
async fn should_clear_cookies_when_refresh_token_is_rejected() {
    let h = Harness::start().await;
    let id = h
        .backend
        .add_user("asha@example.com", PASSWORD, None, Role::Consumer);
    let mut session = h.backend.expired_session(id);
    session.refresh_token = "refresh-unknown".to_owned();

    let resp = h
        .server
        .get("/dashboard")
        .add_header(header::COOKIE, session.cookie_header())
        .await;

    assert_eq!(resp.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    let access = set_cookie(&resp, ACCESS_TOKEN_COOKIE).expect("cleared access cookie");
    assert_eq!(access.value(), "");
}

#[tokio::test]
async fn should_treat_garbage_token_as_anonymous_on_home_page() {
    let h = Harness::start().await;

    let resp = h
        .server
        .get("/")
        .add_header(
            header::COOKIE,
            header::HeaderValue::from_static("sb-access-token=garbage"),
        )
        .await;

    assert_eq!(resp.status_code(), StatusCode::OK);
    assert!(resp.json::<Value>()["viewer"].is_null());
    let access = set_cookie(&resp, ACCESS_TOKEN_COOKIE).expect("cleared access cookie");
    assert_eq!(access.value(), "");
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_readiness_from_auth_provider() {
    let h = Harness::start().await;

    assert_eq!(h.server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(h.server.get("/readyz").await.status_code(), StatusCode::OK);

    h.backend.set_auth_down(true);
    assert_eq!(
        h.server.get("/readyz").await.status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}
