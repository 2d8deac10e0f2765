//! Composition planning.
//!
//! Orders tracks by layering priority, merges their sequenced layers and
//! sizes the output. Planning is a pure function of the snapshot: the same
//! composition always yields the same plan.

use serde::{Deserialize, Serialize};

use reelplan_common::{PlanningConfig, ReelplanError, ReelplanResult};
use reelplan_project_model::{Composition, Track, ValidationReport};

use crate::sequencer::{effective_duration_ms, find_overlaps, sequence_track, SequencedLayer};
use crate::timebase::{secs_to_frames, FPS};

/// Shortest composition, in seconds.
pub const MIN_DURATION_SECS: u64 = 5;

/// Silence appended after the last keyframe end so playback never stops
/// on the final visible frame.
pub const TRAILING_PADDING_MS: f64 = 5000.0;

/// What to do with overlapping keyframes on a video or audio track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Fail planning with a validation fault.
    #[default]
    Reject,
    /// Pass overlapping layers through; the later one draws on top.
    Allow,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOptions {
    pub overlap: OverlapPolicy,
}

impl PlanOptions {
    pub fn from_config(config: &PlanningConfig) -> Self {
        Self {
            overlap: if config.allow_overlaps {
                OverlapPolicy::Allow
            } else {
                OverlapPolicy::Reject
            },
        }
    }
}

/// Frame-indexed rendering schedule.
///
/// `layers` is in compositing order: earlier entries are drawn first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionPlan {
    pub project_id: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub duration_in_frames: u64,
    pub layers: Vec<SequencedLayer>,
}

impl CompositionPlan {
    pub fn duration_secs(&self) -> f64 {
        self.duration_in_frames as f64 / f64::from(self.fps)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

/// Tracks in layering order: video, then music and voiceover, then text.
///
/// The sort is stable, so tracks of equal priority keep insertion order.
pub fn sort_tracks(tracks: &[Track]) -> Vec<&Track> {
    let mut sorted: Vec<&Track> = tracks.iter().collect();
    sorted.sort_by_key(|track| track.track_type.priority());
    sorted
}

/// Latest keyframe end across all tracks in milliseconds, using effective
/// durations. Keyframes whose media is still generating count too, so the
/// timeline does not shrink while jobs are pending.
pub fn latest_keyframe_end_ms(composition: &Composition) -> Option<f64> {
    composition
        .tracks
        .iter()
        .flat_map(|track| composition.frames_for(&track.id))
        .map(|frame| {
            let media = frame
                .data
                .media_id()
                .and_then(|id| composition.media(id));
            frame.timestamp + effective_duration_ms(frame, media)
        })
        .reduce(f64::max)
}

/// `max(5, ceil((latest_end + 5000) / 1000))` seconds, in frames.
pub fn composition_duration_frames(composition: &Composition) -> u64 {
    let secs = match latest_keyframe_end_ms(composition) {
        Some(end) => {
            let padded = ((end + TRAILING_PADDING_MS) / 1000.0).ceil();
            if padded.is_finite() && padded > 0.0 {
                (padded as u64).max(MIN_DURATION_SECS)
            } else {
                MIN_DURATION_SECS
            }
        }
        None => MIN_DURATION_SECS,
    };
    secs_to_frames(secs, FPS)
}

/// Every structural fault in the composition, including media-track
/// overlaps when the policy rejects them.
pub fn check_composition(composition: &Composition, options: &PlanOptions) -> ValidationReport {
    let mut report = match composition.validate() {
        Ok(()) => ValidationReport::new(),
        Err(report) => report,
    };

    if options.overlap == OverlapPolicy::Reject {
        for track in &composition.tracks {
            for issue in find_overlaps(
                track,
                composition.frames_for(&track.id),
                &composition.media_items,
            ) {
                report.push(issue);
            }
        }
    }

    report
}

/// Plan with default options (overlaps rejected).
pub fn plan_composition(composition: &Composition) -> ReelplanResult<CompositionPlan> {
    plan_composition_with(composition, &PlanOptions::default())
}

/// Build the rendering schedule for a composition.
///
/// Structural faults are reported together as one
/// [`ReelplanError::Validation`]. Missing or unfinished media never fails
/// planning; those keyframes simply produce no layer.
#[tracing::instrument(skip(composition), fields(project = %composition.project.id))]
pub fn plan_composition_with(
    composition: &Composition,
    options: &PlanOptions,
) -> ReelplanResult<CompositionPlan> {
    let report = check_composition(composition, options);
    if !report.is_empty() {
        tracing::warn!(issues = report.len(), "Composition failed validation");
        return Err(ReelplanError::validation(report.messages()));
    }

    let size = composition.project.frame_size();
    let layers: Vec<SequencedLayer> = sort_tracks(&composition.tracks)
        .into_iter()
        .flat_map(|track| {
            sequence_track(
                track,
                composition.frames_for(&track.id),
                &composition.media_items,
            )
        })
        .collect();

    let plan = CompositionPlan {
        project_id: composition.project.id.clone(),
        width: size.width,
        height: size.height,
        fps: FPS,
        duration_in_frames: composition_duration_frames(composition),
        layers,
    };

    tracing::debug!(
        width = plan.width,
        height = plan.height,
        frames = plan.duration_in_frames,
        layers = plan.layers.len(),
        "Planned composition"
    );

    Ok(plan)
}
