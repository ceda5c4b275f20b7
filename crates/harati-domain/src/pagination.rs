//! Sort direction and list options for storage listings.

use serde::{Deserialize, Serialize};

/// Generic sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sort {
    Desc,
    Asc,
}

impl Sort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desc => "desc",
            Self::Asc => "asc",
        }
    }
}

/// Column + direction pair used by object listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    pub column: String,
    pub order: Sort,
}

/// Listing window for the object-storage `list` call.
///
/// - `limit`: 1–1000, default 100
/// - `offset`: default 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    pub limit: u32,
    pub offset: u32,
    #[serde(rename = "sortBy")]
    pub sort_by: SortBy,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            sort_by: SortBy {
                column: "created_at".to_owned(),
                order: Sort::Desc,
            },
        }
    }
}

impl ListOptions {
    /// Clamp `limit` to the range accepted by the storage API.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, 1000),
            ..self
        }
    }
}
