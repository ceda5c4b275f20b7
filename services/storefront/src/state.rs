use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::infra::auth::SupabaseAuth;
use crate::infra::rest::{RestProfileRepository, RestSettingsRepository};
use crate::infra::storage::SupabaseStorage;
use crate::infra::supabase::SupabaseClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub client: SupabaseClient,
    pub config: Arc<StorefrontConfig>,
}

impl AppState {
    pub fn new(config: StorefrontConfig) -> anyhow::Result<Self> {
        let client = SupabaseClient::new(&config.supabase_url, &config.supabase_anon_key)?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn auth(&self) -> SupabaseAuth {
        SupabaseAuth {
            client: self.client.clone(),
        }
    }

    /// Repositories take the caller's access token so row policies see the
    /// signed-in user. `None` falls back to the anon key.
    pub fn profile_repo(&self, bearer: Option<&str>) -> RestProfileRepository {
        RestProfileRepository {
            client: self.client.clone(),
            bearer: bearer.map(str::to_owned),
        }
    }

    pub fn settings_repo(&self, bearer: Option<&str>) -> RestSettingsRepository {
        RestSettingsRepository {
            client: self.client.clone(),
            bearer: bearer.map(str::to_owned),
        }
    }

    pub fn storage(&self, bearer: Option<&str>) -> SupabaseStorage {
        SupabaseStorage {
            client: self.client.clone(),
            bearer: bearer.map(str::to_owned),
        }
    }

    pub fn cookie_domain(&self) -> Option<&str> {
        self.config.cookie_domain.as_deref()
    }
}
