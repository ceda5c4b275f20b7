use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use harati_domain::role::Role;

use crate::handlers::home::NavLink;
use crate::handlers::session::Viewer;
use crate::state::AppState;
use crate::usecase::dashboard::DashboardUseCase;

static OWNER_LINKS: [NavLink; 3] = [
    NavLink {
        label: "Manage Images",
        href: "/owner/images",
    },
    NavLink {
        label: "Manage Users",
        href: "/owner/users",
    },
    NavLink {
        label: "Site Settings",
        href: "/owner/settings",
    },
];

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub user_id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub role_label: &'static str,
    pub is_owner: bool,
    pub owner_links: &'static [NavLink],
}

// ── GET /dashboard ───────────────────────────────────────────────────────────

pub async fn dashboard_page(
    viewer: Viewer,
    State(state): State<AppState>,
) -> (CookieJar, Json<DashboardPage>) {
    let usecase = DashboardUseCase {
        repo: state.profile_repo(Some(&viewer.signed_in.access_token)),
    };
    let view = usecase.execute(&viewer.signed_in).await;
    let is_owner = view.role.is_owner();
    let page = DashboardPage {
        user_id: viewer.signed_in.user.id.to_string(),
        email: view.email,
        full_name: view.full_name,
        role: view.role,
        role_label: view.role.label(),
        is_owner,
        owner_links: if is_owner { &OWNER_LINKS } else { &[] },
    };
    (viewer.jar, Json(page))
}
