use axum::http::{StatusCode, header};
use serde_json::Value;

use crate::helpers::{Harness, location};

#[tokio::test]
async fn should_redirect_anonymous_visitor_to_login() {
    let h = Harness::start().await;

    for path in ["/dashboard", "/owner/images", "/owner/users", "/owner/settings"] {
        let resp = h.server.get(path).await;
        assert_eq!(resp.status_code(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), "/login", "{path}");
    }
}

#[tokio::test]
async fn should_redirect_consumer_away_from_owner_pages() {
    let h = Harness::start().await;
    let (_, session) = h.consumer();

    for path in ["/owner/images", "/owner/users", "/owner/settings"] {
        let resp = h
            .server
            .get(path)
            .add_header(header::COOKIE, session.cookie_header())
            .await;
        assert_eq!(resp.status_code(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), "/dashboard", "{path}");
    }
}

#[tokio::test]
async fn should_show_consumer_dashboard_without_owner_links() {
    let h = Harness::start().await;
    let (id, session) = h.consumer();

    let resp = h
        .server
        .get("/dashboard")
        .add_header(header::COOKIE, session.cookie_header())
        .await;

    assert_eq!(resp.status_code(), StatusCode::OK);
    let body = resp.json::<Value>();
    assert_eq!(body["user_id"], id.to_string());
    assert_eq!(body["email"], "shopper@example.com");
    assert_eq!(body["role"], "consumer");
    assert_eq!(body["role_label"], "Consumer");
    assert_eq!(body["is_owner"], false);
    assert_eq!(body["owner_links"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn should_show_owner_tools_on_owner_dashboard() {
    let h = Harness::start().await;
    let (_, session) = h.owner();

    let resp = h
        .server
        .get("/dashboard")
        .add_header(header::COOKIE, session.cookie_header())
        .await;

    let body = resp.json::<Value>();
    assert_eq!(body["role_label"], "Owner");
    assert_eq!(body["is_owner"], true);
    let hrefs: Vec<&str> = body["owner_links"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l["href"].as_str())
        .collect();
    assert_eq!(
        hrefs,
        vec!["/owner/images", "/owner/users", "/owner/settings"]
    );
}

#[tokio::test]
async fn should_fall_back_to_account_identity_when_profile_is_missing() {
    let h = Harness::start().await;
    let (id, session) = h.owner();
    h.backend.remove_profile(id);

    let resp = h
        .server
        .get("/dashboard")
        .add_header(header::COOKIE, session.cookie_header())
        .await;

    assert_eq!(resp.status_code(), StatusCode::OK);
    let body = resp.json::<Value>();
    assert_eq!(body["email"], "owner@harati.store");
    assert_eq!(body["role"], "consumer");

    let resp = h
        .server
        .get("/owner/users")
        .add_header(header::COOKIE, session.cookie_header())
        .await;
    assert_eq!(location(&resp), "/dashboard");
}
