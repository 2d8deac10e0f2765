//! Frame compositor: which layers are live at a given frame.
//!
//! Evaluation walks the plan's layer list in order, so the result is
//! already stacked back to front (video, audio, text; within a track,
//! later keyframes on top). Nothing is re-sorted per frame.

use serde::Serialize;

use crate::planner::CompositionPlan;
use crate::sequencer::{LayerPayload, SequencedLayer};
use crate::timebase::frame_to_ms;

/// A layer that is live at the evaluated frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveLayer<'a> {
    /// Stacking position among the frame's active layers; 0 is drawn first.
    pub z_index: usize,
    pub keyframe_id: &'a str,
    pub track_id: &'a str,
    /// Frames elapsed since the layer started; media playback offset.
    pub local_frame: u64,
    pub payload: &'a LayerPayload,
}

/// A single frame's composition instructions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameComposition<'a> {
    pub frame_index: u64,

    /// Frame start in milliseconds.
    pub time_ms: f64,

    /// Back to front.
    pub layers: Vec<ActiveLayer<'a>>,
}

impl<'a> ActiveLayer<'a> {
    fn new(z_index: usize, layer: &'a SequencedLayer, frame: u64) -> Self {
        Self {
            z_index,
            keyframe_id: &layer.keyframe_id,
            track_id: &layer.track_id,
            local_frame: frame - layer.start_frame,
            payload: &layer.payload,
        }
    }
}

/// Layers live at `frame`, back to front.
///
/// Frames at or past the end of the composition have no layers.
pub fn active_layers(
    plan: &CompositionPlan,
    frame: u64,
) -> impl Iterator<Item = ActiveLayer<'_>> + '_ {
    let in_range = frame < plan.duration_in_frames;
    plan.layers
        .iter()
        .filter(move |layer| in_range && layer.is_active_at(frame))
        .enumerate()
        .map(move |(z_index, layer)| ActiveLayer::new(z_index, layer, frame))
}

/// Composition instructions for one frame.
pub fn compose_frame(plan: &CompositionPlan, frame: u64) -> FrameComposition<'_> {
    FrameComposition {
        frame_index: frame,
        time_ms: frame_to_ms(frame, plan.fps),
        layers: active_layers(plan, frame).collect(),
    }
}

/// Compute the composition for every frame of the plan.
pub fn compute_compositions(plan: &CompositionPlan) -> Vec<FrameComposition<'_>> {
    (0..plan.duration_in_frames)
        .map(|frame| compose_frame(plan, frame))
        .collect()
}

/// Layers that start within `premount_frames` after `frame` and are not
/// live yet, so a player can load them ahead of time.
pub fn layers_premounted_at(
    plan: &CompositionPlan,
    frame: u64,
    premount_frames: u64,
) -> impl Iterator<Item = &SequencedLayer> + '_ {
    let horizon = frame.saturating_add(premount_frames);
    plan.layers.iter().filter(move |layer| {
        layer.duration_in_frames > 0
            && layer.start_frame > frame
            && layer.start_frame <= horizon
            && layer.start_frame < plan.duration_in_frames
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{plan_composition, plan_composition_with, OverlapPolicy, PlanOptions};
    use reelplan_project_model::{
        empty_composition, Composition, KeyFrame, MediaItem, MediaType, Project, TextOverlay,
        Track, TrackType,
    };

    fn sample_plan() -> CompositionPlan {
        let (composition, _) = Composition::from_parts(
            Project::placeholder(),
            vec![
                Track::new("t", "p", TrackType::Text, "Text"),
                Track::new("v", "p", TrackType::Video, "Video"),
            ],
            vec![
                KeyFrame::text("caption", "t", 1000.0, 2000.0, TextOverlay::new("Hello")),
                KeyFrame::media("clip", "v", 0.0, 0.0, "clip"),
                KeyFrame::media("later", "v", 9000.0, 1000.0, "clip"),
                KeyFrame::media("lost", "v", 6000.0, 1000.0, "missing"),
            ],
            vec![MediaItem::completed(
                "clip",
                MediaType::Video,
                "https://c.mp4",
                Some(4000.0),
            )],
        );
        plan_composition(&composition).unwrap()
    }

    #[test]
    fn test_active_layers_are_stacked_by_track_priority() {
        let plan = sample_plan();
        let layers: Vec<_> = active_layers(&plan, 45).collect();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].keyframe_id, "clip");
        assert_eq!(layers[0].z_index, 0);
        assert_eq!(layers[0].local_frame, 45);
        assert_eq!(layers[1].keyframe_id, "caption");
        assert_eq!(layers[1].z_index, 1);
        assert_eq!(layers[1].local_frame, 15);
    }

    #[test]
    fn test_text_is_active_for_its_whole_interval() {
        let plan = sample_plan();
        for frame in 0..plan.duration_in_frames {
            let live = active_layers(&plan, frame).any(|l| l.keyframe_id == "caption");
            assert_eq!(live, (30..90).contains(&frame), "frame {frame}");
        }
    }

    #[test]
    fn test_missing_media_never_becomes_active() {
        let plan = sample_plan();
        let compositions = compute_compositions(&plan);
        assert_eq!(compositions.len() as u64, plan.duration_in_frames);
        assert!(compositions
            .iter()
            .flat_map(|c| &c.layers)
            .all(|l| l.keyframe_id != "lost"));
    }

    #[test]
    fn test_empty_plan_has_no_layers_anywhere() {
        let plan = plan_composition(empty_composition()).unwrap();
        for frame in 0..plan.duration_in_frames + 10 {
            assert_eq!(active_layers(&plan, frame).count(), 0);
        }
    }

    #[test]
    fn test_nothing_is_active_past_the_end() {
        let plan = sample_plan();
        assert_eq!(active_layers(&plan, plan.duration_in_frames).count(), 0);
        assert_eq!(active_layers(&plan, u64::MAX).count(), 0);
    }

    #[test]
    fn test_overlapping_layers_last_declared_on_top() {
        let (composition, _) = Composition::from_parts(
            Project::placeholder(),
            vec![Track::new("v", "p", TrackType::Video, "Video")],
            vec![
                KeyFrame::media("first", "v", 0.0, 2000.0, "clip"),
                KeyFrame::media("second", "v", 0.0, 2000.0, "clip"),
            ],
            vec![MediaItem::completed("clip", MediaType::Video, "https://c.mp4", None)],
        );
        let plan = plan_composition_with(
            &composition,
            &PlanOptions {
                overlap: OverlapPolicy::Allow,
            },
        )
        .unwrap();

        let frame = compose_frame(&plan, 10);
        let ids: Vec<_> = frame.layers.iter().map(|l| l.keyframe_id).collect();
        assert_eq!(ids, vec!["first", "second"]);
        assert!((frame.time_ms - 333.333).abs() < 0.001);
    }

    #[test]
    fn test_premount_window() {
        let plan = sample_plan();
        // 90 frames = 3s at 30fps
        let upcoming: Vec<_> = layers_premounted_at(&plan, 0, 90)
            .map(|l| l.keyframe_id.as_str())
            .collect();
        assert_eq!(upcoming, vec!["caption"]);

        let upcoming: Vec<_> = layers_premounted_at(&plan, 200, 90)
            .map(|l| l.keyframe_id.as_str())
            .collect();
        assert_eq!(upcoming, vec!["later"]);

        assert_eq!(layers_premounted_at(&plan, 0, 0).count(), 0);
    }

    #[test]
    fn test_frame_composition_serializes_payload_role() {
        let plan = sample_plan();
        let json = serde_json::to_value(compose_frame(&plan, 40)).unwrap();
        assert_eq!(json["frameIndex"], 40);
        assert_eq!(json["layers"][0]["payload"]["role"], "visual");
        assert_eq!(json["layers"][0]["payload"]["url"], "https://c.mp4");
        assert_eq!(json["layers"][1]["payload"]["role"], "text");
    }
}
