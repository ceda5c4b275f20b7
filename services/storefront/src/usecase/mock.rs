//! In-memory ports shared by the use-case unit tests.

use std::sync::Mutex;

use bytes::Bytes;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use harati_auth_types::token::{AUTHENTICATED_AUDIENCE, AccessClaims, issue_access_token};
use harati_domain::id::UserId;
use harati_domain::pagination::ListOptions;
use harati_domain::profile::Profile;
use harati_domain::role::Role;
use harati_domain::settings::{SettingKey, SettingRow};

use crate::domain::repository::{AuthPort, ProfileRepository, SettingsRepository, StoragePort};
use crate::domain::types::{AuthUser, ObjectMetadata, Session, SignUpOutcome, StoredObject};
use crate::error::StorefrontError;

pub const SECRET: &str = "unit-test-jwt-secret";

pub fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn token_for(user_id: Uuid, exp: u64) -> String {
    issue_access_token(
        &AccessClaims {
            sub: user_id.to_string(),
            email: Some("viewer@harati.store".into()),
            aud: AUTHENTICATED_AUDIENCE.into(),
            exp,
        },
        SECRET,
    )
}

pub fn auth_user(id: Uuid) -> AuthUser {
    AuthUser {
        id: UserId(id),
        email: Some("viewer@harati.store".into()),
        full_name: Some("Viewer".into()),
    }
}

pub fn session_for(id: Uuid) -> Session {
    Session {
        access_token: token_for(id, now() + 3600),
        refresh_token: format!("refresh-{id}"),
        expires_in: 3600,
        user: auth_user(id),
    }
}

pub fn profile(id: Uuid, role: Role) -> Profile {
    Profile {
        id: UserId(id),
        email: format!("{id}@harati.store"),
        full_name: None,
        role,
        avatar_url: None,
        created_at: Utc::now(),
    }
}

fn backend(status: u16, message: &str) -> StorefrontError {
    StorefrontError::Backend {
        status,
        message: message.into(),
    }
}

// ── Auth ─────────────────────────────────────────────────────────────────────

/// Auth port with scripted answers.
#[derive(Default)]
pub struct MockAuth {
    pub user: Option<AuthUser>,
    pub refresh_result: Option<Result<Session, u16>>,
    /// Session returned by sign-in and sign-up.
    pub session: Option<Session>,
    /// Rejection returned by sign-in, sign-up and sign-out.
    pub reject: Option<(u16, &'static str)>,
    pub transport_down: bool,
    pub calls: Mutex<Vec<String>>,
}

impl MockAuth {
    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_owned());
    }

    fn rejected(&self) -> Result<(), StorefrontError> {
        match self.reject {
            Some((status, message)) => Err(backend(status, message)),
            None => Ok(()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl AuthPort for MockAuth {
    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _full_name: &str,
    ) -> Result<SignUpOutcome, StorefrontError> {
        self.record("sign_up");
        self.rejected()?;
        let session = self.session.clone();
        let user = match &session {
            Some(s) => s.user.clone(),
            None => self.user.clone().expect("mock user"),
        };
        Ok(SignUpOutcome { user, session })
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<Session, StorefrontError> {
        self.record("sign_in");
        self.rejected()?;
        Ok(self.session.clone().expect("mock session"))
    }

    async fn refresh_session(&self, _refresh_token: &str) -> Result<Session, StorefrontError> {
        self.record("refresh");
        match self.refresh_result.clone() {
            Some(Ok(session)) => Ok(session),
            Some(Err(status)) => Err(backend(
                status,
                "Invalid Refresh Token: Refresh Token Not Found",
            )),
            None => panic!("unexpected refresh"),
        }
    }

    async fn get_user(&self, _access_token: &str) -> Result<Option<AuthUser>, StorefrontError> {
        self.record("get_user");
        if self.transport_down {
            return Err(StorefrontError::Internal(anyhow::anyhow!(
                "connection refused"
            )));
        }
        Ok(self.user.clone())
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), StorefrontError> {
        self.record("sign_out");
        self.rejected()
    }

    async fn health(&self) -> Result<(), StorefrontError> {
        Ok(())
    }
}

// ── Profiles ─────────────────────────────────────────────────────────────────

pub struct MockProfiles {
    pub profiles: Vec<Profile>,
    pub fail: bool,
    pub updates: Mutex<Vec<(UserId, Role)>>,
    pub calls: Mutex<u32>,
}

impl MockProfiles {
    pub fn with(profiles: Vec<Profile>) -> Self {
        Self {
            profiles,
            fail: false,
            updates: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with(Vec::new())
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }

    fn hit(&self) -> Result<(), StorefrontError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(backend(500, "relation \"profiles\" does not exist"));
        }
        Ok(())
    }
}

impl ProfileRepository for MockProfiles {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Profile>, StorefrontError> {
        self.hit()?;
        Ok(self.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Profile>, StorefrontError> {
        self.hit()?;
        Ok(self.profiles.clone())
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<(), StorefrontError> {
        self.hit()?;
        self.updates.lock().unwrap().push((id, role));
        Ok(())
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSettings {
    pub rows: Mutex<Vec<SettingRow>>,
    /// Key whose upsert is rejected.
    pub reject_key: Option<SettingKey>,
    pub fetch_fails: bool,
    pub upserts: Mutex<Vec<SettingKey>>,
}

impl MockSettings {
    pub fn with(rows: Vec<SettingRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn upserted(&self) -> Vec<SettingKey> {
        self.upserts.lock().unwrap().clone()
    }
}

impl SettingsRepository for MockSettings {
    async fn fetch(&self, keys: &[SettingKey]) -> Result<Vec<SettingRow>, StorefrontError> {
        if self.fetch_fails {
            return Err(backend(503, "upstream unavailable"));
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| keys.iter().any(|k| k.as_str() == r.key))
            .cloned()
            .collect())
    }

    async fn upsert(&self, key: SettingKey, value: &Value) -> Result<(), StorefrontError> {
        self.upserts.lock().unwrap().push(key);
        if self.reject_key == Some(key) {
            return Err(backend(
                403,
                "new row violates row-level security policy for table \"site_settings\"",
            ));
        }
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|r| r.key != key.as_str());
        rows.push(SettingRow {
            key: key.as_str().to_owned(),
            value: value.clone(),
        });
        Ok(())
    }
}

// ── Storage ──────────────────────────────────────────────────────────────────

/// Single-bucket storage keyed by object path.
#[derive(Default)]
pub struct MockStorage {
    pub objects: Mutex<Vec<(String, u64)>>,
    /// Upload number (0-based) that fails.
    pub fail_upload_at: Option<usize>,
    pub uploads: Mutex<Vec<(String, String, String)>>,
}

impl MockStorage {
    pub fn with(names: &[&str]) -> Self {
        Self {
            objects: Mutex::new(names.iter().map(|n| ((*n).to_owned(), 1024)).collect()),
            ..Self::default()
        }
    }

    pub fn uploaded(&self) -> Vec<(String, String, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

impl StoragePort for MockStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorefrontError> {
        let mut uploads = self.uploads.lock().unwrap();
        if self.fail_upload_at == Some(uploads.len()) {
            return Err(backend(400, "The resource already exists"));
        }
        uploads.push((bucket.to_owned(), path.to_owned(), content_type.to_owned()));
        self.objects
            .lock()
            .unwrap()
            .insert(0, (path.to_owned(), bytes.len() as u64));
        Ok(())
    }

    async fn list(
        &self,
        _bucket: &str,
        _prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<StoredObject>, StorefrontError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .skip(options.offset as usize)
            .take(options.limit as usize)
            .map(|(name, size)| StoredObject {
                name: name.clone(),
                id: Some(Uuid::new_v4().to_string()),
                created_at: None,
                metadata: Some(ObjectMetadata {
                    size: Some(*size),
                    mimetype: None,
                }),
            })
            .collect())
    }

    async fn remove(&self, _bucket: &str, paths: &[String]) -> Result<(), StorefrontError> {
        self.objects
            .lock()
            .unwrap()
            .retain(|(name, _)| !paths.contains(name));
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("https://demo.supabase.co/storage/v1/object/public/{bucket}/{path}")
    }
}
