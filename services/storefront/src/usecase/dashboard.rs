use harati_domain::role::Role;

use crate::domain::repository::ProfileRepository;
use crate::domain::types::SignedIn;

/// What the dashboard shows about the signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
}

pub struct DashboardUseCase<P: ProfileRepository> {
    pub repo: P,
}

impl<P: ProfileRepository> DashboardUseCase<P> {
    /// A missing or unreadable profile falls back to a consumer view built
    /// from the auth identity.
    pub async fn execute(&self, viewer: &SignedIn) -> DashboardView {
        let profile = match self.repo.find_by_id(viewer.user.id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(user_id = %viewer.user.id, error = %e, "profile lookup failed");
                None
            }
        };
        match profile {
            Some(p) => DashboardView {
                email: p.email,
                full_name: p.full_name.or_else(|| viewer.user.full_name.clone()),
                role: p.role,
            },
            None => DashboardView {
                email: viewer.user.email.clone().unwrap_or_default(),
                full_name: viewer.user.full_name.clone(),
                role: Role::Consumer,
            },
        }
    }
}
