use axum::{
    Router,
    extract::DefaultBodyLimit,
    handler::Handler,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use harati_core::health::healthz;
use harati_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{login, login_page, logout, signup, signup_page},
    dashboard::dashboard_page,
    health::readyz,
    home::home_page,
    images::{delete_image, images_page, upload_images},
    settings::{save_settings, settings_page, upload_hero_image, upload_reel},
    users::{update_role, users_page},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Storefront
        .route("/", get(home_page))
        // Auth
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
        // Dashboard
        .route("/dashboard", get(dashboard_page))
        // Owner: images
        .route(
            "/owner/images",
            get(images_page).post(upload_images.layer(upload_limit.clone())),
        )
        .route("/owner/images/{name}", delete(delete_image))
        // Owner: users
        .route("/owner/users", get(users_page))
        .route("/owner/users/{id}/role", patch(update_role))
        // Owner: site settings
        .route("/owner/settings", get(settings_page).put(save_settings))
        .route(
            "/owner/settings/hero/{slot}",
            post(upload_hero_image.layer(upload_limit.clone())),
        )
        .route(
            "/owner/settings/reels/{slot}",
            post(upload_reel.layer(upload_limit)),
        )
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
