use axum::extract::Multipart;

use crate::domain::types::UploadFile;
use crate::error::StorefrontError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Every file part of the form. Plain text fields are skipped.
pub async fn read_files(mut multipart: Multipart) -> Result<Vec<UploadFile>, StorefrontError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| StorefrontError::InvalidUpload(e.body_text()))?
    {
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        if file_name.is_empty() {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| StorefrontError::InvalidUpload(e.body_text()))?;
        files.push(UploadFile {
            file_name,
            content_type,
            bytes,
        });
    }
    Ok(files)
}

/// Exactly one file is expected; extra parts are ignored.
pub async fn read_single_file(multipart: Multipart) -> Result<UploadFile, StorefrontError> {
    read_files(multipart)
        .await?
        .into_iter()
        .next()
        .ok_or(StorefrontError::MissingFile)
}
