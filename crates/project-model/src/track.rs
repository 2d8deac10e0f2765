//! Timeline tracks.
//!
//! A track is a lane holding keyframes of one media role. Its type fixes
//! both the render role of its keyframes and its position in the layer
//! stack.

use serde::{Deserialize, Serialize};

/// A lane on a project's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,

    /// Owning project.
    #[serde(default)]
    pub project_id: String,

    #[serde(rename = "type")]
    pub track_type: TrackType,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub locked: bool,
}

/// Track media role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Video,
    Music,
    Voiceover,
    Text,
    /// A type this version does not know; contributes no layers.
    #[serde(other)]
    Unknown,
}

/// What a keyframe on a track turns into when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderRole {
    /// Video or still image.
    Visual,
    /// Music or voiceover.
    Audio,
    /// Inline text overlay.
    Text,
}

impl TrackType {
    /// Layering priority: lower values composite first (further back).
    ///
    /// Music and voiceover share a priority so a stable sort keeps their
    /// relative insertion order.
    pub fn priority(self) -> u8 {
        match self {
            TrackType::Video => 0,
            TrackType::Music | TrackType::Voiceover => 1,
            TrackType::Text => 2,
            TrackType::Unknown => 3,
        }
    }

    pub fn role(self) -> Option<RenderRole> {
        match self {
            TrackType::Video => Some(RenderRole::Visual),
            TrackType::Music | TrackType::Voiceover => Some(RenderRole::Audio),
            TrackType::Text => Some(RenderRole::Text),
            TrackType::Unknown => None,
        }
    }

    /// Whether keyframes on this track reference media items.
    pub fn is_media(self) -> bool {
        matches!(self.role(), Some(RenderRole::Visual | RenderRole::Audio))
    }
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        track_type: TrackType,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            track_type,
            label: label.into(),
            locked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_table() {
        assert_eq!(TrackType::Video.priority(), 0);
        assert_eq!(TrackType::Music.priority(), 1);
        assert_eq!(TrackType::Voiceover.priority(), 1);
        assert_eq!(TrackType::Text.priority(), 2);
        assert!(TrackType::Unknown.priority() > TrackType::Text.priority());
    }

    #[test]
    fn test_roles() {
        assert_eq!(TrackType::Video.role(), Some(RenderRole::Visual));
        assert_eq!(TrackType::Voiceover.role(), Some(RenderRole::Audio));
        assert_eq!(TrackType::Text.role(), Some(RenderRole::Text));
        assert_eq!(TrackType::Unknown.role(), None);
        assert!(TrackType::Music.is_media());
        assert!(!TrackType::Text.is_media());
    }

    #[test]
    fn test_track_json_shape() {
        let raw = r#"{"id":"t1","projectId":"p1","type":"voiceover","label":"VO","locked":true}"#;
        let track: Track = serde_json::from_str(raw).unwrap();
        assert_eq!(track.track_type, TrackType::Voiceover);
        assert!(track.locked);

        let json = serde_json::to_string(&track).unwrap();
        assert!(json.contains("\"type\":\"voiceover\""));
        assert!(json.contains("\"projectId\":\"p1\""));
    }

    #[test]
    fn test_unknown_track_type_is_tolerated() {
        let track: Track = serde_json::from_str(r#"{"id":"t1","type":"sfx"}"#).unwrap();
        assert_eq!(track.track_type, TrackType::Unknown);
        assert_eq!(track.label, "");
    }
}
