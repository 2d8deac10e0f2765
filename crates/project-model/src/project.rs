//! Project metadata and output framing.
//!
//! A project is the top-level container that owns tracks and media items.
//! Its aspect ratio selects the output frame dimensions from a fixed table.

use serde::{Deserialize, Serialize};

/// Stable id carried by [`Project::placeholder`].
pub const PLACEHOLDER_PROJECT_ID: &str = "__placeholder__";

/// Output dimensions used when the aspect ratio is unset or unknown.
pub const DEFAULT_FRAME_SIZE: FrameSize = FrameSize {
    width: 1024,
    height: 720,
};

/// A video project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project identifier.
    pub id: String,

    /// Human-readable title.
    #[serde(default)]
    pub title: String,

    /// Output aspect ratio. `None` selects [`DEFAULT_FRAME_SIZE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation time in epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
}

/// Supported output aspect ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
    /// Any value outside the known set; rendered at the default size.
    #[serde(other)]
    Unknown,
}

/// Output frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Output dimensions for this aspect ratio.
    pub fn frame_size(self) -> FrameSize {
        match self {
            AspectRatio::Landscape => FrameSize {
                width: 1024,
                height: 576,
            },
            AspectRatio::Portrait => FrameSize {
                width: 576,
                height: 1024,
            },
            AspectRatio::Square => FrameSize {
                width: 1024,
                height: 1024,
            },
            AspectRatio::Unknown => DEFAULT_FRAME_SIZE,
        }
    }

    /// Parse the `W:H` notation used in project files.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "16:9" => Some(AspectRatio::Landscape),
            "9:16" => Some(AspectRatio::Portrait),
            "1:1" => Some(AspectRatio::Square),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Unknown => "unknown",
        }
    }
}

impl Project {
    /// Create a new project stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        aspect_ratio: Option<AspectRatio>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            aspect_ratio,
            description: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Placeholder used before a real project has loaded.
    ///
    /// Every field is populated so consumers never hit a missing value.
    pub fn placeholder() -> Self {
        Self {
            id: PLACEHOLDER_PROJECT_ID.to_string(),
            title: String::new(),
            aspect_ratio: Some(AspectRatio::Landscape),
            description: Some(String::new()),
            created_at: 0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_PROJECT_ID
    }

    /// Output frame dimensions for this project.
    pub fn frame_size(&self) -> FrameSize {
        self.aspect_ratio
            .map(AspectRatio::frame_size)
            .unwrap_or(DEFAULT_FRAME_SIZE)
    }
}
