//! Core data models.
//!
//! A [`FileRecord`] is one accepted input line in typed form. Field renames
//! bind each field to its short wire key (see [`crate::schema`]).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Verdict the upstream agent reached for a file.
///
/// Serialized as its integer label: `1` malicious, `2` clean, `3` unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Disposition {
    Malicious,
    Clean,
    Unknown,
}

impl Disposition {
    pub const ALL: [Disposition; 3] = [Self::Malicious, Self::Clean, Self::Unknown];

    /// The wire label of this disposition.
    pub fn label(self) -> i64 {
        match self {
            Self::Malicious => 1,
            Self::Clean => 2,
            Self::Unknown => 3,
        }
    }

    /// Inverse of [`label`](Self::label); `None` outside `{1, 2, 3}`.
    pub fn from_label(label: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

impl From<Disposition> for i64 {
    fn from(d: Disposition) -> Self {
        d.label()
    }
}

impl TryFrom<i64> for Disposition {
    type Error = String;

    fn try_from(label: i64) -> Result<Self, Self::Error> {
        Self::from_label(label).ok_or_else(|| format!("unknown disposition label {}", label))
    }
}

/// A file seen by an upstream agent, with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRecord {
    /// Epoch seconds.
    #[serde(rename = "ts")]
    pub timestamp: i64,
    #[serde(rename = "pt")]
    pub processing_time: i64,
    #[serde(rename = "si")]
    pub session_id: Uuid,
    #[serde(rename = "uu")]
    pub user_id: Uuid,
    #[serde(rename = "bg")]
    pub business_id: Uuid,
    /// Content hash of the file.
    #[serde(rename = "sha")]
    pub sha: String,
    #[serde(rename = "nm")]
    pub file_name: String,
    #[serde(rename = "ph")]
    pub file_path: String,
    #[serde(rename = "dp")]
    pub disposition: Disposition,
}
