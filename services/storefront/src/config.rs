use serde::Deserialize;

use harati_core::config::Config;

/// Storefront configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontConfig {
    /// Project base URL of the hosted backend (e.g. "https://xyz.supabase.co").
    pub supabase_url: String,
    /// Public anon key sent as `apikey` on every backend call.
    pub supabase_anon_key: String,
    /// Project JWT secret used to inspect access tokens locally.
    pub supabase_jwt_secret: String,
    /// Cookie domain attribute. Host-only cookies when unset.
    #[serde(default)]
    pub cookie_domain: Option<String>,
    /// TCP port for the HTTP server (default 3000). Env var: `STOREFRONT_PORT`.
    #[serde(default = "default_port")]
    pub storefront_port: u16,
    /// Bucket managed from the owner image page. Env var: `IMAGES_BUCKET`.
    #[serde(default = "default_images_bucket")]
    pub images_bucket: String,
    /// Bucket holding hero images and reels. Env var: `ASSETS_BUCKET`.
    #[serde(default = "default_assets_bucket")]
    pub assets_bucket: String,
    /// Request body limit for upload routes, in bytes (default 50 MiB).
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_port() -> u16 {
    3000
}

fn default_images_bucket() -> String {
    "images".to_owned()
}

fn default_assets_bucket() -> String {
    "site_assets".to_owned()
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

impl Config for StorefrontConfig {}
