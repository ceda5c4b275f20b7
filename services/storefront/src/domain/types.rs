use bytes::Bytes;
use serde::{Deserialize, Serialize};

use harati_domain::id::UserId;

/// Identity as reported by the auth provider.
///
/// `full_name` comes from the sign-up metadata and may be missing for users
/// created through the provider console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

/// Token pair handed out by sign-in, sign-up and refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: AuthUser,
}

/// Sign-up result. `session` is `None` while e-mail confirmation is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user: AuthUser,
    pub session: Option<Session>,
}

/// Object metadata returned by a storage listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<ObjectMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mimetype: Option<String>,
}

impl StoredObject {
    pub fn size(&self) -> Option<u64> {
        self.metadata.as_ref().and_then(|m| m.size)
    }

    /// Folder placeholders have no id.
    pub fn is_file(&self) -> bool {
        self.id.is_some()
    }
}

/// Size in kilobytes with one decimal, as shown in the image grid.
pub fn size_kb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / 1024.0)
}

/// A confirmed, signed-in visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub user: AuthUser,
    pub access_token: String,
}

/// One file taken from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Extension of an uploaded file name: the ASCII alphanumerics of the text
/// after the last `.` (the whole name when there is none), or `bin` when
/// nothing usable is left.
pub fn file_extension(file_name: &str) -> String {
    let raw = file_name.rsplit('.').next().unwrap_or(file_name);
    let ext: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
    if ext.is_empty() { "bin".to_owned() } else { ext }
}
