use harati_domain::id::UserId;
use harati_domain::profile::Profile;
use harati_domain::role::Role;

use crate::domain::repository::ProfileRepository;
use crate::error::StorefrontError;

/// A profile as seen by the owner managing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedUser {
    pub profile: Profile,
    pub is_current_user: bool,
    pub can_edit_role: bool,
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<P: ProfileRepository> {
    pub repo: P,
}

impl<P: ProfileRepository> ListUsersUseCase<P> {
    pub async fn execute(&self, current: UserId) -> Result<Vec<ManagedUser>, StorefrontError> {
        let profiles = self.repo.list().await?;
        Ok(profiles
            .into_iter()
            .map(|profile| {
                let is_current_user = profile.id == current;
                ManagedUser {
                    profile,
                    is_current_user,
                    can_edit_role: !is_current_user,
                }
            })
            .collect())
    }
}

// ── UpdateRole ───────────────────────────────────────────────────────────────

pub struct UpdateRoleUseCase<P: ProfileRepository> {
    pub repo: P,
}

impl<P: ProfileRepository> UpdateRoleUseCase<P> {
    /// Owners cannot demote themselves; that check runs before any backend call.
    pub async fn execute(
        &self,
        current: UserId,
        target: UserId,
        role: Role,
    ) -> Result<(), StorefrontError> {
        if current == target {
            return Err(StorefrontError::OwnRoleChange);
        }
        self.repo.update_role(target, role).await?;
        tracing::info!(%target, role = role.as_str(), by = %current, "role updated");
        Ok(())
    }
}
