#![allow(async_fn_in_trait)]

use bytes::Bytes;
use serde_json::Value;

use harati_domain::id::UserId;
use harati_domain::pagination::ListOptions;
use harati_domain::profile::Profile;
use harati_domain::role::Role;
use harati_domain::settings::{SettingKey, SettingRow};

use crate::domain::types::{AuthUser, Session, SignUpOutcome, StoredObject};
use crate::error::StorefrontError;

/// Hosted auth provider.
pub trait AuthPort: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpOutcome, StorefrontError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, StorefrontError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, StorefrontError>;

    /// `Ok(None)` when the provider no longer recognises the token.
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, StorefrontError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), StorefrontError>;

    async fn health(&self) -> Result<(), StorefrontError>;
}

/// `profiles` table.
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Profile>, StorefrontError>;

    /// All profiles, newest first.
    async fn list(&self) -> Result<Vec<Profile>, StorefrontError>;

    async fn update_role(&self, id: UserId, role: Role) -> Result<(), StorefrontError>;
}

/// `site_settings` table.
pub trait SettingsRepository: Send + Sync {
    async fn fetch(&self, keys: &[SettingKey]) -> Result<Vec<SettingRow>, StorefrontError>;

    async fn upsert(&self, key: SettingKey, value: &Value) -> Result<(), StorefrontError>;
}

/// Object storage.
pub trait StoragePort: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorefrontError>;

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<StoredObject>, StorefrontError>;

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorefrontError>;

    /// Public URL of an object. Pure; never touches the network.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}
