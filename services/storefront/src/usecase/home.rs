use harati_domain::settings::{ReelItem, SettingKey, SiteSettings};

use crate::domain::repository::SettingsRepository;

/// Homepage media, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeContent {
    pub offer_banner: Option<String>,
    pub hero_images: Vec<String>,
    pub reels: Vec<ReelItem>,
}

impl From<&SiteSettings> for HomeContent {
    fn from(settings: &SiteSettings) -> Self {
        Self {
            offer_banner: settings.offer_banner().map(str::to_owned),
            hero_images: settings.display_hero_images(),
            reels: settings.reels_for_display(),
        }
    }
}

pub struct HomeContentUseCase<S: SettingsRepository> {
    pub repo: S,
}

impl<S: SettingsRepository> HomeContentUseCase<S> {
    /// Never fails: an unreachable settings table shows the placeholders.
    pub async fn execute(&self) -> HomeContent {
        let settings = match self.repo.fetch(&SettingKey::ALL).await {
            Ok(rows) => SiteSettings::from_rows(&rows),
            Err(e) => {
                tracing::warn!(error = %e, "site settings unavailable, using defaults");
                SiteSettings::default()
            }
        };
        HomeContent::from(&settings)
    }
}
