use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use harati_domain::id::UserId;
use harati_domain::role::Role;

use crate::error::StorefrontError;
use crate::handlers::session::Owner;
use crate::state::AppState;
use crate::usecase::users::{ListUsersUseCase, ManagedUser, UpdateRoleUseCase};

#[derive(Debug, Serialize)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(serialize_with = "harati_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "harati_core::serde::to_date")]
    pub joined: DateTime<Utc>,
    pub is_current_user: bool,
    pub can_edit_role: bool,
}

impl From<ManagedUser> for UserRow {
    fn from(u: ManagedUser) -> Self {
        let p = u.profile;
        Self {
            id: p.id.to_string(),
            email: p.email,
            full_name: p.full_name,
            role: p.role,
            created_at: p.created_at,
            joined: p.created_at,
            is_current_user: u.is_current_user,
            can_edit_role: u.can_edit_role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersPage {
    pub count: usize,
    pub owners: usize,
    pub consumers: usize,
    pub users: Vec<UserRow>,
}

impl UsersPage {
    fn new(users: Vec<UserRow>) -> Self {
        let owners = users.iter().filter(|u| u.role.is_owner()).count();
        Self {
            count: users.len(),
            owners,
            consumers: users.len() - owners,
            users,
        }
    }
}

// ── GET /owner/users ─────────────────────────────────────────────────────────

pub async fn users_page(
    owner: Owner,
    State(state): State<AppState>,
) -> (CookieJar, Result<Json<UsersPage>, StorefrontError>) {
    let usecase = ListUsersUseCase {
        repo: state.profile_repo(Some(&owner.signed_in.access_token)),
    };
    let result = usecase.execute(owner.signed_in.user.id).await.map(|users| {
        Json(UsersPage::new(
            users.into_iter().map(UserRow::from).collect(),
        ))
    });
    (owner.jar, result)
}

// ── PATCH /owner/users/{id}/role ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct RoleUpdated {
    pub id: String,
    pub role: Role,
    pub success: String,
}

pub async fn update_role(
    owner: Owner,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateRoleRequest>,
) -> (CookieJar, Result<Json<RoleUpdated>, StorefrontError>) {
    let usecase = UpdateRoleUseCase {
        repo: state.profile_repo(Some(&owner.signed_in.access_token)),
    };
    let result = usecase
        .execute(owner.signed_in.user.id, id, body.role)
        .await
        .map(|()| {
            Json(RoleUpdated {
                id: id.to_string(),
                role: body.role,
                success: format!("Successfully updated user role to {}", body.role),
            })
        });
    (owner.jar, result)
}
