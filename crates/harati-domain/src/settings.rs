//! Site settings stored as key/value rows.
//!
//! Values are loosely typed JSON on the wire. [`SiteSettings::from_rows`] is the
//! single place where they are shape-checked and fitted to their fixed slot counts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of arched hero frames on the homepage.
pub const HERO_SLOTS: usize = 4;

/// Number of video reels on the homepage.
pub const REEL_SLOTS: usize = 2;

/// Placeholder photos shown in hero frames that have no uploaded image.
pub const DEFAULT_HERO_IMAGES: [&str; HERO_SLOTS] = [
    "https://images.unsplash.com/photo-1549497557-cd6b306b9967?q=80&w=2070&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1543360256-4299b87f4628?q=80&w=2070&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1605370200882-7c70c061732e?q=80&w=1974&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1551065975-6b3a2bb60b29?q=80&w=1974&auto=format&fit=crop",
];

/// Keys of the `site_settings` table, in save order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    OfferText,
    HeroImages,
    VideoReels,
    ReelDescriptions,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        Self::OfferText,
        Self::HeroImages,
        Self::VideoReels,
        Self::ReelDescriptions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OfferText => "offer_text",
            Self::HeroImages => "hero_images",
            Self::VideoReels => "video_reels",
            Self::ReelDescriptions => "reel_descriptions",
        }
    }
}

/// One raw `{key, value}` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingRow {
    pub key: String,
    pub value: Value,
}

/// Pad with empty strings or truncate so the result has exactly `slots` entries.
pub fn fit_slots(mut values: Vec<String>, slots: usize) -> Vec<String> {
    values.resize(slots, String::new());
    values
}

/// Fully-typed settings with fixed-length slot arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub offer_text: String,
    pub hero_images: Vec<String>,
    pub reels: Vec<String>,
    pub reel_descriptions: Vec<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            offer_text: String::new(),
            hero_images: vec![String::new(); HERO_SLOTS],
            reels: vec![String::new(); REEL_SLOTS],
            reel_descriptions: vec![String::new(); REEL_SLOTS],
        }
    }
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect(),
    )
}

impl SiteSettings {
    /// Build settings from whatever rows the store returned.
    ///
    /// Missing keys and values of the wrong shape leave the empty default in place.
    pub fn from_rows(rows: &[SettingRow]) -> Self {
        let mut settings = Self::default();
        let find = |key: SettingKey| rows.iter().find(|r| r.key == key.as_str());

        if let Some(Value::String(text)) = find(SettingKey::OfferText).map(|r| &r.value) {
            settings.offer_text = text.clone();
        }
        if let Some(images) = find(SettingKey::HeroImages).and_then(|r| string_array(&r.value)) {
            settings.hero_images = fit_slots(images, HERO_SLOTS);
        }
        if let Some(reels) = find(SettingKey::VideoReels).and_then(|r| string_array(&r.value)) {
            settings.reels = fit_slots(reels, REEL_SLOTS);
        }
        if let Some(descs) = find(SettingKey::ReelDescriptions).and_then(|r| string_array(&r.value))
        {
            settings.reel_descriptions = fit_slots(descs, REEL_SLOTS);
        }
        settings
    }

    /// Re-fit every slot array. Applied to user input before it is saved.
    pub fn fitted(self) -> Self {
        Self {
            offer_text: self.offer_text,
            hero_images: fit_slots(self.hero_images, HERO_SLOTS),
            reels: fit_slots(self.reels, REEL_SLOTS),
            reel_descriptions: fit_slots(self.reel_descriptions, REEL_SLOTS),
        }
    }

    /// Rows to upsert, one per key, in [`SettingKey::ALL`] order.
    pub fn to_rows(&self) -> Vec<SettingRow> {
        SettingKey::ALL
            .iter()
            .map(|key| {
                let value = match key {
                    SettingKey::OfferText => Value::String(self.offer_text.clone()),
                    SettingKey::HeroImages => Value::from(self.hero_images.clone()),
                    SettingKey::VideoReels => Value::from(self.reels.clone()),
                    SettingKey::ReelDescriptions => Value::from(self.reel_descriptions.clone()),
                };
                SettingRow {
                    key: key.as_str().to_owned(),
                    value,
                }
            })
            .collect()
    }

    /// Offer banner text, or `None` when the banner should be hidden.
    pub fn offer_banner(&self) -> Option<&str> {
        Some(self.offer_text.as_str()).filter(|t| !t.is_empty())
    }

    /// Hero frames with placeholders substituted for empty slots.
    pub fn display_hero_images(&self) -> Vec<String> {
        DEFAULT_HERO_IMAGES
            .iter()
            .enumerate()
            .map(|(i, fallback)| match self.hero_images.get(i) {
                Some(url) if !url.is_empty() => url.clone(),
                _ => (*fallback).to_owned(),
            })
            .collect()
    }

    /// Reels that actually have a video, paired with their optional caption.
    pub fn reels_for_display(&self) -> Vec<ReelItem> {
        (0..REEL_SLOTS)
            .filter_map(|i| {
                let src = self.reels.get(i).filter(|s| !s.is_empty())?;
                let caption = self
                    .reel_descriptions
                    .get(i)
                    .filter(|d| !d.is_empty())
                    .cloned();
                Some(ReelItem {
                    src: src.clone(),
                    caption,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReelItem {
    pub src: String,
    pub caption: Option<String>,
}
