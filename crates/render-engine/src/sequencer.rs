//! Per-track sequencing.
//!
//! Turns one track's unordered keyframes into time-ordered render records.
//! Records may overlap; layering among overlapping records is left to the
//! compositor (later records draw on top).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use reelplan_project_model::{
    KeyFrame, KeyFrameData, MediaItem, MediaType, RenderRole, TextOverlay, Track, TrackType,
    ValidationIssue,
};

use crate::resolver::{resolve_duration, resolve_url, FALLBACK_DURATION_MS};
use crate::timebase::{duration_to_frames, ms_to_frame, FPS};

/// One renderable placement on the frame grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencedLayer {
    pub keyframe_id: String,
    pub track_id: String,
    pub start_frame: u64,
    /// May be zero for very short keyframes; such layers never activate.
    pub duration_in_frames: u64,
    pub payload: LayerPayload,
}

/// What a layer draws or plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum LayerPayload {
    Visual {
        media_id: String,
        kind: VisualKind,
        url: String,
    },
    Audio {
        media_id: String,
        url: String,
    },
    Text {
        overlay: TextOverlay,
    },
}

/// How a visual layer is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualKind {
    /// Played back in sync with the timeline.
    Video,
    /// Still image scaled to cover the frame.
    Image,
}

impl LayerPayload {
    pub fn role(&self) -> RenderRole {
        match self {
            LayerPayload::Visual { .. } => RenderRole::Visual,
            LayerPayload::Audio { .. } => RenderRole::Audio,
            LayerPayload::Text { .. } => RenderRole::Text,
        }
    }

    /// Resolved media URL, absent for text overlays.
    pub fn url(&self) -> Option<&str> {
        match self {
            LayerPayload::Visual { url, .. } | LayerPayload::Audio { url, .. } => Some(url),
            LayerPayload::Text { .. } => None,
        }
    }
}

impl SequencedLayer {
    pub fn role(&self) -> RenderRole {
        self.payload.role()
    }

    /// First frame after the layer (exclusive).
    pub fn end_frame(&self) -> u64 {
        self.start_frame.saturating_add(self.duration_in_frames)
    }

    /// Whether the layer is on screen / audible at `frame`.
    pub fn is_active_at(&self, frame: u64) -> bool {
        self.start_frame <= frame && frame < self.end_frame()
    }
}

/// Length of a keyframe in milliseconds: its own duration when positive,
/// else the media's reported duration, else [`FALLBACK_DURATION_MS`].
pub fn effective_duration_ms(frame: &KeyFrame, media: Option<&MediaItem>) -> f64 {
    if frame.duration > 0.0 {
        return frame.duration;
    }
    media.map(resolve_duration).unwrap_or(FALLBACK_DURATION_MS)
}

/// Length of a keyframe once it no longer depends on generation progress:
/// its own duration when positive, else the duration of completed media.
/// `None` while the media is missing or still generating.
fn settled_duration_ms(frame: &KeyFrame, media: Option<&MediaItem>) -> Option<f64> {
    if frame.duration > 0.0 {
        return Some(frame.duration);
    }
    media
        .filter(|media| media.is_completed())
        .map(resolve_duration)
}

/// Media item behind a keyframe, if it references one that exists.
fn referenced_media<'a>(
    frame: &KeyFrame,
    media_items: &'a BTreeMap<String, MediaItem>,
) -> Option<&'a MediaItem> {
    frame.data.media_id().and_then(|id| media_items.get(id))
}

/// Keyframes in timeline order; equal timestamps keep declaration order.
pub fn time_ordered(frames: &[KeyFrame]) -> Vec<&KeyFrame> {
    let mut ordered: Vec<&KeyFrame> = frames.iter().collect();
    ordered.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    ordered
}

/// Sequence one track.
///
/// Keyframes whose media is missing, unfinished, URL-less, or of a type the
/// track cannot present are skipped; text keyframes only need non-empty
/// text.
pub fn sequence_track(
    track: &Track,
    frames: &[KeyFrame],
    media_items: &BTreeMap<String, MediaItem>,
) -> Vec<SequencedLayer> {
    let Some(role) = track.track_type.role() else {
        tracing::debug!(track = %track.id, "skipping track of unknown type");
        return Vec::new();
    };

    let mut layers = Vec::with_capacity(frames.len());
    let mut skipped = 0usize;

    for frame in time_ordered(frames) {
        let media = referenced_media(frame, media_items);
        let Some(payload) = layer_payload(role, frame, media) else {
            skipped += 1;
            continue;
        };

        layers.push(SequencedLayer {
            keyframe_id: frame.id.clone(),
            track_id: track.id.clone(),
            start_frame: ms_to_frame(frame.timestamp, FPS),
            duration_in_frames: duration_to_frames(effective_duration_ms(frame, media), FPS),
            payload,
        });
    }

    tracing::debug!(
        track = %track.id,
        layers = layers.len(),
        skipped,
        "sequenced track"
    );

    layers
}

fn layer_payload(
    role: RenderRole,
    frame: &KeyFrame,
    media: Option<&MediaItem>,
) -> Option<LayerPayload> {
    match (role, &frame.data) {
        (RenderRole::Text, KeyFrameData::Text(overlay)) => overlay.is_renderable().then(|| {
            let mut overlay = overlay.clone();
            overlay.opacity = overlay.clamped_opacity();
            LayerPayload::Text { overlay }
        }),
        (RenderRole::Text, KeyFrameData::Media(_)) => None,
        (RenderRole::Visual | RenderRole::Audio, KeyFrameData::Text(_)) => None,
        (RenderRole::Visual, KeyFrameData::Media(reference)) => {
            let media = media?;
            let kind = match media.media_type {
                MediaType::Video => VisualKind::Video,
                MediaType::Image => VisualKind::Image,
                _ => return None,
            };
            let url = resolve_url(media)?;
            Some(LayerPayload::Visual {
                media_id: reference.media_id.clone(),
                kind,
                url: url.to_string(),
            })
        }
        (RenderRole::Audio, KeyFrameData::Media(reference)) => {
            let media = media?;
            if !(media.media_type.is_audio() || media.media_type == MediaType::Video) {
                return None;
            }
            let url = resolve_url(media)?;
            Some(LayerPayload::Audio {
                media_id: reference.media_id.clone(),
                url: url.to_string(),
            })
        }
    }
}

/// Overlapping keyframes on a video or audio track.
///
/// Intervals are half-open, so back-to-back keyframes do not overlap. A
/// keyframe without its own duration is only checked once its media has
/// completed; until then its length is unknown and readiness must not
/// decide whether the snapshot is valid. Text tracks may stack captions and
/// are never reported.
pub fn find_overlaps(
    track: &Track,
    frames: &[KeyFrame],
    media_items: &BTreeMap<String, MediaItem>,
) -> Vec<ValidationIssue> {
    if track.track_type == TrackType::Text || !track.track_type.is_media() {
        return Vec::new();
    }

    let mut issues = Vec::new();
    // (end, keyframe id) of the furthest-reaching keyframe seen so far
    let mut reach: Option<(f64, &str)> = None;

    for frame in time_ordered(frames) {
        let Some(length) = settled_duration_ms(frame, referenced_media(frame, media_items)) else {
            continue;
        };
        let end = frame.timestamp + length;

        if let Some((reach_end, reach_id)) = reach {
            if frame.timestamp < reach_end {
                issues.push(ValidationIssue::Overlap {
                    track_id: track.id.clone(),
                    first: reach_id.to_string(),
                    second: frame.id.clone(),
                });
            }
            if end > reach_end {
                reach = Some((end, frame.id.as_str()));
            }
        } else {
            reach = Some((end, frame.id.as_str()));
        }
    }

    issues
}
