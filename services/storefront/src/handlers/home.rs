use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use harati_domain::settings::ReelItem;

use crate::domain::types::SignedIn;
use crate::handlers::session::CurrentSession;
use crate::state::AppState;
use crate::usecase::home::HomeContentUseCase;

#[derive(Debug, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

/// Storefront navigation, left to right.
pub static NAV_LINKS: [NavLink; 5] = [
    NavLink {
        label: "NEW",
        href: "/collections/new",
    },
    NavLink {
        label: "COLLECTIONS",
        href: "/collections",
    },
    NavLink {
        label: "ABOUT US",
        href: "/about",
    },
    NavLink {
        label: "BEST SELLER",
        href: "/collections/best-seller",
    },
    NavLink {
        label: "SALE",
        href: "/collections/sale",
    },
];

#[derive(Debug, Serialize)]
pub struct ViewerSummary {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl From<&SignedIn> for ViewerSummary {
    fn from(viewer: &SignedIn) -> Self {
        Self {
            id: viewer.user.id.to_string(),
            email: viewer.user.email.clone(),
            full_name: viewer.user.full_name.clone(),
        }
    }
}

// ── GET / ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub viewer: Option<ViewerSummary>,
    pub nav: &'static [NavLink],
    pub offer_banner: Option<String>,
    pub hero_images: Vec<String>,
    pub reels: Vec<ReelItem>,
}

pub async fn home_page(
    session: CurrentSession,
    State(state): State<AppState>,
) -> (CookieJar, Json<HomePage>) {
    // Public page: settings are read with the anon key.
    let usecase = HomeContentUseCase {
        repo: state.settings_repo(None),
    };
    let content = usecase.execute().await;
    let page = HomePage {
        viewer: session.viewer.as_ref().map(ViewerSummary::from),
        nav: &NAV_LINKS,
        offer_banner: content.offer_banner,
        hero_images: content.hero_images,
        reels: content.reels,
    };
    (session.jar, Json(page))
}
