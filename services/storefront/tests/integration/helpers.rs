use axum::http::header;
use axum_extra::extract::cookie::Cookie;
use axum_test::{TestResponse, TestServer};
use uuid::Uuid;

use harati_core::config::Config as _;
use harati_domain::role::Role;
use harati_testing::auth::{TEST_ANON_KEY, TEST_JWT_SECRET, TestSession};
use harati_testing::backend::MockBackend;

use harati_storefront::config::StorefrontConfig;
use harati_storefront::router::build_router;
use harati_storefront::state::AppState;

pub const PASSWORD: &str = "secret123";

/// Storefront wired to a fresh mock backend.
pub struct Harness {
    pub server: TestServer,
    pub backend: MockBackend,
}

impl Harness {
    pub async fn start() -> Self {
        let backend = MockBackend::start().await;
        let config = StorefrontConfig::from_pairs(vec![
            ("SUPABASE_URL".to_owned(), backend.url()),
            ("SUPABASE_ANON_KEY".to_owned(), TEST_ANON_KEY.to_owned()),
            ("SUPABASE_JWT_SECRET".to_owned(), TEST_JWT_SECRET.to_owned()),
        ])
        .unwrap();
        let state = AppState::new(config).unwrap();
        let server = TestServer::new(build_router(state)).unwrap();
        Self { server, backend }
    }

    /// Register a user and return an active session for them.
    pub fn signed_in(&self, email: &str, role: Role) -> (Uuid, TestSession) {
        let id = self.backend.add_user(email, PASSWORD, None, role);
        (id, self.backend.sign_in(id))
    }

    pub fn owner(&self) -> (Uuid, TestSession) {
        self.signed_in("owner@harati.store", Role::Owner)
    }

    pub fn consumer(&self) -> (Uuid, TestSession) {
        self.signed_in("shopper@example.com", Role::Consumer)
    }
}

/// `Set-Cookie` headers on a response, parsed.
pub fn set_cookies(response: &TestResponse) -> Vec<Cookie<'static>> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|s| Cookie::parse(s.to_owned()).ok())
        .collect()
}

pub fn set_cookie(response: &TestResponse, name: &str) -> Option<Cookie<'static>> {
    set_cookies(response).into_iter().find(|c| c.name() == name)
}

pub fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}
