//! Profile role.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Access level stored on a profile.
///
/// Wire format: lowercase string (`"owner"` / `"consumer"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    #[default]
    Consumer,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Consumer => "consumer",
        }
    }

    /// Human-facing label shown on the dashboard badge.
    pub fn label(self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Consumer => "Consumer",
        }
    }

    pub fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "consumer" => Ok(Self::Consumer),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}
