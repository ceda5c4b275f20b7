use harati_domain::settings::{HERO_SLOTS, REEL_SLOTS, SettingKey, SiteSettings};

use crate::domain::repository::{SettingsRepository, StoragePort};
use crate::domain::types::{UploadFile, file_extension};
use crate::error::StorefrontError;
use crate::usecase::images::now_millis;

// ── LoadSettings ─────────────────────────────────────────────────────────────

pub struct LoadSettingsUseCase<S: SettingsRepository> {
    pub repo: S,
}

impl<S: SettingsRepository> LoadSettingsUseCase<S> {
    pub async fn execute(&self) -> Result<SiteSettings, StorefrontError> {
        let rows = self.repo.fetch(&SettingKey::ALL).await?;
        Ok(SiteSettings::from_rows(&rows))
    }
}

// ── SaveSettings ─────────────────────────────────────────────────────────────

pub struct SaveSettingsUseCase<S: SettingsRepository> {
    pub repo: S,
}

impl<S: SettingsRepository> SaveSettingsUseCase<S> {
    /// One upsert per key in fixed order. Stops at the first rejection; keys
    /// saved before it stay saved.
    pub async fn execute(&self, settings: SiteSettings) -> Result<SiteSettings, StorefrontError> {
        let settings = settings.fitted();
        for (key, row) in SettingKey::ALL.iter().zip(settings.to_rows()) {
            self.repo
                .upsert(*key, &row.value)
                .await
                .map_err(StorefrontError::into_settings_failure)?;
        }
        tracing::info!("site settings saved");
        Ok(settings)
    }
}

// ── UploadAsset ──────────────────────────────────────────────────────────────

/// Homepage media slot kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSlot {
    Hero,
    Reel,
}

impl AssetSlot {
    pub fn slots(self) -> usize {
        match self {
            Self::Hero => HERO_SLOTS,
            Self::Reel => REEL_SLOTS,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Hero => "image",
            Self::Reel => "video",
        }
    }

    /// Object path inside the assets bucket.
    pub fn path(self, slot: usize, millis: i64, original_name: &str) -> String {
        let ext = file_extension(original_name);
        match self {
            Self::Hero => format!("hero_{slot}_{millis}.{ext}"),
            Self::Reel => format!("reels/reel_{slot}_{millis}.{ext}"),
        }
    }
}

pub struct UploadAssetUseCase<St: StoragePort> {
    pub storage: St,
    pub bucket: String,
}

impl<St: StoragePort> UploadAssetUseCase<St> {
    /// Stores the file and returns its public URL. The settings row itself is
    /// only updated when the owner saves the form.
    pub async fn execute(
        &self,
        kind: AssetSlot,
        slot: usize,
        file: UploadFile,
    ) -> Result<String, StorefrontError> {
        if slot >= kind.slots() {
            return Err(StorefrontError::InvalidSlot {
                slot,
                max: kind.slots() - 1,
            });
        }
        let path = kind.path(slot, now_millis(), &file.file_name);
        self.storage
            .upload(&self.bucket, &path, file.bytes, &file.content_type)
            .await
            .map_err(|e| e.into_asset_failure(kind.noun()))?;
        tracing::info!(bucket = %self.bucket, %path, "site asset uploaded");
        Ok(self.storage.public_url(&self.bucket, &path))
    }
}
