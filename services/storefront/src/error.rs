use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use harati_core::error::error_response;

/// Storefront error variants.
///
/// Backend rejections keep the provider's message verbatim; it is what the
/// page shows to the user.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("Failed to save settings: {message}")]
    SettingsNotSaved { status: u16, message: String },
    #[error("Error uploading {asset}: {message}")]
    AssetUpload {
        status: u16,
        asset: &'static str,
        message: String,
    },
    #[error("You cannot change your own role")]
    OwnRoleChange,
    #[error("slot {slot} is out of range (max {max})")]
    InvalidSlot { slot: usize, max: usize },
    #[error("no file uploaded")]
    MissingFile,
    #[error("invalid upload: {0}")]
    InvalidUpload(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

fn upstream_status(status: u16) -> StatusCode {
    if status >= 500 {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::BAD_REQUEST
    }
}

impl StorefrontError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Backend { .. } => "BACKEND_ERROR",
            Self::SettingsNotSaved { .. } => "SETTINGS_NOT_SAVED",
            Self::AssetUpload { .. } => "ASSET_UPLOAD_FAILED",
            Self::OwnRoleChange => "OWN_ROLE_CHANGE",
            Self::InvalidSlot { .. } => "INVALID_SLOT",
            Self::MissingFile => "MISSING_FILE",
            Self::InvalidUpload(_) => "INVALID_UPLOAD",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Backend { status, .. }
            | Self::SettingsNotSaved { status, .. }
            | Self::AssetUpload { status, .. } => upstream_status(*status),
            Self::OwnRoleChange
            | Self::InvalidSlot { .. }
            | Self::MissingFile
            | Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wrap a failed upsert with the settings-page prefix.
    pub fn into_settings_failure(self) -> Self {
        match self {
            Self::Backend { status, message } => Self::SettingsNotSaved { status, message },
            other => other,
        }
    }

    /// Wrap a failed hero or reel upload. `asset` is "image" or "video".
    pub fn into_asset_failure(self, asset: &'static str) -> Self {
        match self {
            Self::Backend { status, message } => Self::AssetUpload {
                status,
                asset,
                message,
            },
            other => other,
        }
    }
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(e) => {
                let cause = format!("{e:#}");
                tracing::error!(error = %cause, kind = self.kind(), "internal error");
            }
            other if status.is_server_error() => {
                tracing::error!(error = %other, kind = other.kind(), "backend failure");
            }
            _ => {}
        }
        error_response(status, self.kind(), &self.to_string())
    }
}
