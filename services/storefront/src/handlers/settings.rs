use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use harati_domain::settings::{HERO_SLOTS, REEL_SLOTS, SiteSettings};

use crate::error::StorefrontError;
use crate::handlers::multipart::read_single_file;
use crate::handlers::session::Owner;
use crate::state::AppState;
use crate::usecase::settings::{
    AssetSlot, LoadSettingsUseCase, SaveSettingsUseCase, UploadAssetUseCase,
};

#[derive(Debug, Serialize)]
pub struct SettingsPage {
    pub offer_text: String,
    pub hero_images: Vec<String>,
    pub reels: Vec<String>,
    pub reel_descriptions: Vec<String>,
    pub hero_slots: usize,
    pub reel_slots: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
}

impl SettingsPage {
    fn new(settings: SiteSettings, success: Option<String>) -> Self {
        Self {
            offer_text: settings.offer_text,
            hero_images: settings.hero_images,
            reels: settings.reels,
            reel_descriptions: settings.reel_descriptions,
            hero_slots: HERO_SLOTS,
            reel_slots: REEL_SLOTS,
            success,
        }
    }
}

// ── GET /owner/settings ──────────────────────────────────────────────────────

pub async fn settings_page(
    owner: Owner,
    State(state): State<AppState>,
) -> (CookieJar, Result<Json<SettingsPage>, StorefrontError>) {
    let usecase = LoadSettingsUseCase {
        repo: state.settings_repo(Some(&owner.signed_in.access_token)),
    };
    let result = usecase
        .execute()
        .await
        .map(|settings| Json(SettingsPage::new(settings, None)));
    (owner.jar, result)
}

// ── PUT /owner/settings ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SaveSettingsRequest {
    #[serde(default)]
    pub offer_text: String,
    #[serde(default)]
    pub hero_images: Vec<String>,
    #[serde(default)]
    pub reels: Vec<String>,
    #[serde(default)]
    pub reel_descriptions: Vec<String>,
}

pub async fn save_settings(
    owner: Owner,
    State(state): State<AppState>,
    Json(body): Json<SaveSettingsRequest>,
) -> (CookieJar, Result<Json<SettingsPage>, StorefrontError>) {
    let usecase = SaveSettingsUseCase {
        repo: state.settings_repo(Some(&owner.signed_in.access_token)),
    };
    let result = usecase
        .execute(SiteSettings {
            offer_text: body.offer_text,
            hero_images: body.hero_images,
            reels: body.reels,
            reel_descriptions: body.reel_descriptions,
        })
        .await
        .map(|saved| {
            Json(SettingsPage::new(
                saved,
                Some("Settings saved successfully!".to_owned()),
            ))
        });
    (owner.jar, result)
}

// ── POST /owner/settings/{hero,reels}/{slot} ─────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AssetUploaded {
    pub slot: usize,
    pub url: String,
}

async fn upload_asset(
    owner: Owner,
    state: AppState,
    kind: AssetSlot,
    slot: usize,
    multipart: Multipart,
) -> (CookieJar, Result<Json<AssetUploaded>, StorefrontError>) {
    let result = async {
        let file = read_single_file(multipart).await?;
        let usecase = UploadAssetUseCase {
            storage: state.storage(Some(&owner.signed_in.access_token)),
            bucket: state.config.assets_bucket.clone(),
        };
        let url = usecase.execute(kind, slot, file).await?;
        Ok(Json(AssetUploaded { slot, url }))
    }
    .await;
    (owner.jar, result)
}

pub async fn upload_hero_image(
    owner: Owner,
    State(state): State<AppState>,
    Path(slot): Path<usize>,
    multipart: Multipart,
) -> (CookieJar, Result<Json<AssetUploaded>, StorefrontError>) {
    upload_asset(owner, state, AssetSlot::Hero, slot, multipart).await
}

pub async fn upload_reel(
    owner: Owner,
    State(state): State<AppState>,
    Path(slot): Path<usize>,
    multipart: Multipart,
) -> (CookieJar, Result<Json<AssetUploaded>, StorefrontError>) {
    upload_asset(owner, state, AssetSlot::Reel, slot, multipart).await
}
