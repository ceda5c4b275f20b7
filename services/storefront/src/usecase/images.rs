use chrono::Utc;
use uuid::Uuid;

use harati_domain::pagination::ListOptions;

use crate::domain::repository::StoragePort;
use crate::domain::types::{UploadFile, file_extension, size_kb};
use crate::error::StorefrontError;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 7;

/// Seven random lowercase base36 characters.
pub fn random_suffix() -> String {
    let mut n = Uuid::new_v4().as_u128();
    (0..SUFFIX_LEN)
        .map(|_| {
            let c = BASE36[(n % 36) as usize] as char;
            n /= 36;
            c
        })
        .collect()
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Stored name for an uploaded image: `<millis>-<suffix>.<ext>`.
pub fn object_name(millis: i64, suffix: &str, original_name: &str) -> String {
    format!("{millis}-{suffix}.{}", file_extension(original_name))
}

/// One tile of the image grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub name: String,
    pub url: String,
    pub size_kb: Option<String>,
    pub created_at: Option<String>,
}

// ── ListImages ───────────────────────────────────────────────────────────────

pub struct ListImagesUseCase<S: StoragePort> {
    pub storage: S,
    pub bucket: String,
}

impl<S: StoragePort> ListImagesUseCase<S> {
    pub async fn execute(&self) -> Result<Vec<ImageEntry>, StorefrontError> {
        let objects = self
            .storage
            .list(&self.bucket, "", &ListOptions::default())
            .await?;
        Ok(objects
            .into_iter()
            .filter(|o| o.is_file())
            .map(|o| ImageEntry {
                url: self.storage.public_url(&self.bucket, &o.name),
                size_kb: o.size().map(size_kb),
                created_at: o.created_at,
                name: o.name,
            })
            .collect())
    }
}

// ── UploadImages ─────────────────────────────────────────────────────────────

pub struct UploadImagesUseCase<S: StoragePort> {
    pub storage: S,
    pub bucket: String,
}

impl<S: StoragePort> UploadImagesUseCase<S> {
    /// Stores every file under a fresh name. The first failure aborts the
    /// batch; files already stored stay stored.
    pub async fn execute(&self, files: Vec<UploadFile>) -> Result<usize, StorefrontError> {
        if files.is_empty() {
            return Err(StorefrontError::MissingFile);
        }
        let count = files.len();
        for file in files {
            let name = object_name(now_millis(), &random_suffix(), &file.file_name);
            self.storage
                .upload(&self.bucket, &name, file.bytes, &file.content_type)
                .await?;
            tracing::info!(bucket = %self.bucket, %name, "image uploaded");
        }
        Ok(count)
    }
}

// ── DeleteImage ──────────────────────────────────────────────────────────────

pub struct DeleteImageUseCase<S: StoragePort> {
    pub storage: S,
    pub bucket: String,
}

impl<S: StoragePort> DeleteImageUseCase<S> {
    pub async fn execute(&self, name: &str) -> Result<(), StorefrontError> {
        if name.is_empty() || name.contains('/') {
            return Err(StorefrontError::InvalidUpload(format!(
                "invalid object name: {name:?}"
            )));
        }
        self.storage
            .remove(&self.bucket, &[name.to_owned()])
            .await?;
        tracing::info!(bucket = %self.bucket, %name, "image deleted");
        Ok(())
    }
}
