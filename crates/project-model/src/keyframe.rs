//! Keyframes: timed placements of media or inline text on a track.
//!
//! A keyframe occupies the half-open interval `[timestamp, timestamp + duration)`
//! in milliseconds on its track. Its payload is either a reference to a
//! media item or a self-contained text overlay.

use serde::{Deserialize, Serialize};

/// Duration given to a newly created text overlay.
pub const DEFAULT_TEXT_DURATION_MS: f64 = 5000.0;

/// A placement on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFrame {
    pub id: String,

    /// Owning track.
    pub track_id: String,

    /// Start time in milliseconds.
    pub timestamp: f64,

    /// Length in milliseconds. Zero means "use the media's own duration".
    #[serde(default)]
    pub duration: f64,

    pub data: KeyFrameData,
}

/// Keyframe payload.
///
/// The `type` field decides the variant: `"text"` is an inline overlay and
/// must parse as one; anything else is a media reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KeyFrameData {
    Text(TextOverlay),
    Media(MediaRef),
}

/// Reference to a media item by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub media_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextTag {
    #[serde(rename = "text")]
    Text,
}

/// Inline text overlay parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    #[serde(rename = "type")]
    pub tag: TextTag,

    /// Opaque id some editors stamp on text payloads; never resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,

    #[serde(default)]
    pub text: String,

    #[serde(default = "default_font_size")]
    pub font_size: f64,

    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    #[serde(default = "default_foreground")]
    pub color: String,

    #[serde(default = "default_background")]
    pub background_color: String,

    #[serde(default)]
    pub position: TextPosition,

    #[serde(default)]
    pub alignment: TextAlignment,

    #[serde(default = "default_opacity")]
    pub opacity: f64,

    #[serde(default = "default_background")]
    pub stroke_color: String,

    #[serde(default)]
    pub stroke_width: f64,
}

/// Vertical anchoring of a text overlay. Unknown values center the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    Top,
    Bottom,
    #[default]
    #[serde(other)]
    Center,
}

/// Horizontal text alignment. Unknown values center the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    Right,
    #[default]
    #[serde(other)]
    Center,
}

fn default_font_size() -> f64 {
    48.0
}

fn default_font_family() -> String {
    "Arial, sans-serif".to_string()
}

fn default_font_weight() -> String {
    "bold".to_string()
}

fn default_foreground() -> String {
    "#ffffff".to_string()
}

fn default_background() -> String {
    "#000000".to_string()
}

fn default_opacity() -> f64 {
    1.0
}

impl TextOverlay {
    /// Overlay with the editor's default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            tag: TextTag::Text,
            media_id: None,
            text: text.into(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            color: default_foreground(),
            background_color: default_background(),
            position: TextPosition::default(),
            alignment: TextAlignment::default(),
            opacity: default_opacity(),
            stroke_color: default_background(),
            stroke_width: 0.0,
        }
    }

    /// Text payloads are self-contained; only empty text is skipped.
    pub fn is_renderable(&self) -> bool {
        !self.text.is_empty()
    }

    /// Opacity clamped to `[0, 1]`.
    pub fn clamped_opacity(&self) -> f64 {
        if self.opacity.is_nan() {
            return 1.0;
        }
        self.opacity.clamp(0.0, 1.0)
    }
}

impl<'de> Deserialize<'de> for KeyFrameData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut value = serde_json::Value::deserialize(deserializer)?;
        let is_text = value.get("type").and_then(serde_json::Value::as_str) == Some("text");

        if !is_text {
            return MediaRef::deserialize(value)
                .map(KeyFrameData::Media)
                .map_err(serde::de::Error::custom);
        }

        // Unset styling arrives as explicit nulls; those take the defaults.
        if let Some(fields) = value.as_object_mut() {
            fields.retain(|_, field| !field.is_null());
        }
        TextOverlay::deserialize(value)
            .map(KeyFrameData::Text)
            .map_err(|e| serde::de::Error::custom(format!("invalid text payload: {e}")))
    }
}

impl KeyFrameData {
    /// Referenced media id, for media payloads only.
    pub fn media_id(&self) -> Option<&str> {
        match self {
            KeyFrameData::Media(media) => Some(&media.media_id),
            KeyFrameData::Text(_) => None,
        }
    }
}

impl KeyFrame {
    /// A keyframe placing a media item.
    pub fn media(
        id: impl Into<String>,
        track_id: impl Into<String>,
        timestamp: f64,
        duration: f64,
        media_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            track_id: track_id.into(),
            timestamp,
            duration,
            data: KeyFrameData::Media(MediaRef {
                media_id: media_id.into(),
            }),
        }
    }

    /// A keyframe placing a text overlay.
    pub fn text(
        id: impl Into<String>,
        track_id: impl Into<String>,
        timestamp: f64,
        duration: f64,
        overlay: TextOverlay,
    ) -> Self {
        Self {
            id: id.into(),
            track_id: track_id.into(),
            timestamp,
            duration,
            data: KeyFrameData::Text(overlay),
        }
    }

    /// A text overlay appended after everything already on its track, with
    /// the default text duration.
    pub fn appended_text(
        id: impl Into<String>,
        track_id: impl Into<String>,
        existing: &[KeyFrame],
        overlay: TextOverlay,
    ) -> Self {
        Self::text(
            id,
            track_id,
            next_append_timestamp(existing),
            DEFAULT_TEXT_DURATION_MS,
            overlay,
        )
    }

    /// End of the declared interval (exclusive), in milliseconds.
    pub fn end(&self) -> f64 {
        self.timestamp + self.duration
    }
}

/// Timestamp for a keyframe appended after everything already on a track:
/// one millisecond past the latest declared end (`1.0` on an empty track).
pub fn next_append_timestamp(frames: &[KeyFrame]) -> f64 {
    let last_end = frames.iter().map(KeyFrame::end).fold(0.0, f64::max);
    last_end + 1.0
}
