//! Media items produced by generation jobs or uploads.

use serde::{Deserialize, Serialize};

/// A generated or uploaded asset referenced by keyframes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,

    #[serde(default)]
    pub project_id: String,

    pub media_type: MediaType,

    pub status: MediaStatus,

    /// Direct playable URL, when the item was uploaded or already resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Raw job output as returned by the generation provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,

    /// Playable length in milliseconds, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Job input parameters (prompt, text, ...). Not used for sequencing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
    Voiceover,
    Music,
    Text,
    #[serde(other)]
    Unknown,
}

/// Generation job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Pending,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl MediaType {
    pub fn is_audio(self) -> bool {
        matches!(self, MediaType::Music | MediaType::Voiceover)
    }
}

impl MediaItem {
    /// A completed item with a direct URL.
    pub fn completed(
        id: impl Into<String>,
        media_type: MediaType,
        url: impl Into<String>,
        duration: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: String::new(),
            media_type,
            status: MediaStatus::Completed,
            url: Some(url.into()),
            output: None,
            duration,
            input: None,
            created_at: None,
        }
    }

    /// An item whose generation job has not finished.
    pub fn pending(id: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            id: id.into(),
            project_id: String::new(),
            media_type,
            status: MediaStatus::Pending,
            url: None,
            output: None,
            duration: None,
            input: None,
            created_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MediaStatus::Completed
    }
}
