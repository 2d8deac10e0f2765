use std::path::PathBuf;

use proptest::prelude::*;
use reelplan_project_model::{
    Composition, KeyFrame, MediaItem, MediaType, Project, RenderRole, TextOverlay, Track,
    TrackType,
};
use reelplan_render_engine::{
    active_layers, fingerprint, fnv1a_64, plan_composition, plan_composition_with, preload_urls,
    CompositionPlan, LayerPayload, OverlapPolicy, PlanOptions, VisualKind,
};

fn load_fixture(name: &str) -> Composition {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join(name);

    Composition::load(path).expect("fixture composition should load")
}

fn role_name(role: RenderRole) -> &'static str {
    match role {
        RenderRole::Visual => "visual",
        RenderRole::Audio => "audio",
        RenderRole::Text => "text",
    }
}

fn layer_signature(plan: &CompositionPlan) -> String {
    plan.layers
        .iter()
        .map(|layer| {
            format!(
                "{}|{}|{}|{}|{}",
                layer.keyframe_id,
                layer.track_id,
                layer.start_frame,
                layer.duration_in_frames,
                role_name(layer.role())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn sample_fixture_plan_signature_is_stable() {
    let plan = plan_composition(&load_fixture("sample-composition.json")).unwrap();

    assert_eq!(plan.project_id, "demo-project");
    assert_eq!((plan.width, plan.height), (576, 1024));
    assert_eq!(plan.fps, 30);
    assert_eq!(plan.duration_in_frames, 1050);
    assert_eq!(plan.layers.len(), 6);
    assert_eq!(fnv1a_64(layer_signature(&plan).as_bytes()), 0x078c485bda8a0546);
}

#[test]
fn sample_fixture_resolves_urls_from_job_output() {
    let plan = plan_composition(&load_fixture("sample-composition.json")).unwrap();

    let image = plan
        .layers
        .iter()
        .find(|layer| layer.keyframe_id == "kv2")
        .unwrap();
    assert_eq!(
        image.payload,
        LayerPayload::Visual {
            media_id: "m-image".into(),
            kind: VisualKind::Image,
            url: "https://cdn.example.com/i1.png".into(),
        }
    );

    let urls: Vec<_> = plan.layers.iter().filter_map(|l| l.payload.url()).collect();
    assert!(urls.contains(&"https://cdn.example.com/score.mp3"));
    assert!(urls.contains(&"https://cdn.example.com/vo.mp3"));
}

#[test]
fn sample_fixture_active_layers_at_frame_100() {
    let plan = plan_composition(&load_fixture("sample-composition.json")).unwrap();

    let ids: Vec<_> = active_layers(&plan, 100).map(|l| l.keyframe_id).collect();
    assert_eq!(ids, vec!["kv1", "kvo1", "km1", "kt1", "kt3"]);

    // Pending media keeps its slot in the timeline but never renders.
    for frame in 300..390 {
        assert!(active_layers(&plan, frame).all(|l| l.keyframe_id != "kv3"));
    }
}

#[test]
fn sample_fixture_preload_order() {
    let composition = load_fixture("sample-composition.json");
    assert_eq!(
        preload_urls(&composition),
        vec![
            "https://cdn.example.com/vo.mp3".to_string(),
            "https://cdn.example.com/v1.mp4".to_string(),
            "https://cdn.example.com/score.mp3".to_string(),
        ]
    );
}

#[test]
fn sample_fixture_plan_is_byte_identical_across_runs() {
    let composition = load_fixture("sample-composition.json");
    let first = serde_json::to_string(&plan_composition(&composition).unwrap()).unwrap();
    let second = serde_json::to_string(&plan_composition(&composition).unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        fingerprint(&composition).unwrap(),
        fingerprint(&load_fixture("sample-composition.json")).unwrap()
    );
}

#[test]
fn overlap_fixture_is_rejected_by_default() {
    let composition = load_fixture("overlap-composition.json");
    let err = plan_composition(&composition).unwrap_err();

    // Two media tracks overlap; stacked captions are fine.
    assert_eq!(err.issues().len(), 2);
    assert!(err.issues().iter().any(|i| i.contains("`a`") && i.contains("`b`")));
    assert!(err.issues().iter().any(|i| i.contains("`m1`") && i.contains("`m2`")));
}

#[test]
fn overlap_fixture_allowed_stacks_later_keyframe_on_top() {
    let composition = load_fixture("overlap-composition.json");
    let plan = plan_composition_with(
        &composition,
        &PlanOptions {
            overlap: OverlapPolicy::Allow,
        },
    )
    .unwrap();

    assert_eq!(plan.duration_in_frames, 330);
    let ids: Vec<_> = active_layers(&plan, 90).map(|l| l.keyframe_id).collect();
    assert_eq!(ids, vec!["a", "b", "m1", "c2"]);
}

#[test]
fn single_keyframe_duration_example() {
    let (composition, _) = Composition::from_parts(
        Project::new("p", "Example", None),
        vec![Track::new("v", "p", TrackType::Video, "Video")],
        vec![KeyFrame::media("k", "v", 10_000.0, 3000.0, "clip")],
        vec![MediaItem::completed("clip", MediaType::Video, "https://c.mp4", None)],
    );
    assert_eq!(plan_composition(&composition).unwrap().duration_in_frames, 540);
}

#[test]
fn text_with_unrecognized_styling_still_renders() {
    let raw = r#"{
        "project": { "id": "p", "title": "Captions", "aspectRatio": "16:9" },
        "tracks": [ { "id": "t", "projectId": "p", "type": "text", "label": "Text" } ],
        "frames": {
            "t": [ {
                "id": "k", "trackId": "t", "timestamp": 0, "duration": 2000,
                "data": { "type": "text", "mediaId": "uuid-1", "text": "Hello", "position": "middle", "color": null }
            } ]
        },
        "mediaItems": {}
    }"#;
    let composition: Composition = serde_json::from_str(raw).unwrap();
    assert!(composition.validate_for_export().is_ok());

    let plan = plan_composition(&composition).unwrap();
    let layers: Vec<_> = active_layers(&plan, 10).collect();
    assert_eq!(layers.len(), 1);
    assert!(matches!(layers[0].payload, LayerPayload::Text { .. }));
}

fn track_type_strategy() -> impl Strategy<Value = TrackType> {
    prop_oneof![
        Just(TrackType::Video),
        Just(TrackType::Music),
        Just(TrackType::Voiceover),
        Just(TrackType::Text),
    ]
}

fn arbitrary_composition(types: &[TrackType], starts: &[u32]) -> Composition {
    let tracks: Vec<Track> = types
        .iter()
        .enumerate()
        .map(|(i, t)| Track::new(format!("track-{i}"), "p", *t, format!("Track {i}")))
        .collect();

    let mut keyframes = Vec::new();
    for (i, track) in tracks.iter().enumerate() {
        let start = f64::from(starts[i % starts.len()]);
        let id = format!("k-{i}");
        keyframes.push(match track.track_type {
            TrackType::Text => KeyFrame::text(id, &track.id, start, 1000.0, TextOverlay::new("x")),
            TrackType::Video => KeyFrame::media(id, &track.id, start, 1000.0, "clip"),
            _ => KeyFrame::media(id, &track.id, start, 1000.0, "song"),
        });
    }

    let (composition, _) = Composition::from_parts(
        Project::new("p", "Generated", None),
        tracks,
        keyframes,
        vec![
            MediaItem::completed("clip", MediaType::Video, "https://c.mp4", None),
            MediaItem::completed("song", MediaType::Music, "https://s.mp3", None),
        ],
    );
    composition
}

proptest! {
    #[test]
    fn layers_follow_stable_track_priority(
        types in proptest::collection::vec(track_type_strategy(), 1..12),
        starts in proptest::collection::vec(0u32..60_000, 1..12),
    ) {
        let composition = arbitrary_composition(&types, &starts);
        let plan = plan_composition(&composition).unwrap();
        prop_assert_eq!(plan.layers.len(), types.len());

        let position = |track_id: &str| -> usize {
            composition.tracks.iter().position(|t| t.id == track_id).unwrap()
        };

        for pair in plan.layers.windows(2) {
            let a = composition.track(&pair[0].track_id).unwrap();
            let b = composition.track(&pair[1].track_id).unwrap();
            let (pa, pb) = (a.track_type.priority(), b.track_type.priority());
            prop_assert!(pa <= pb);
            if pa == pb {
                prop_assert!(position(&a.id) < position(&b.id));
            }
        }
    }

    #[test]
    fn plan_is_deterministic(
        types in proptest::collection::vec(track_type_strategy(), 0..8),
        starts in proptest::collection::vec(0u32..60_000, 1..8),
    ) {
        let composition = arbitrary_composition(&types, &starts);
        let first = serde_json::to_vec(&plan_composition(&composition).unwrap()).unwrap();
        let second = serde_json::to_vec(&plan_composition(&composition).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn text_is_active_exactly_during_its_interval(start in 0u32..100_000, length in 34u32..20_000) {
        let (composition, _) = Composition::from_parts(
            Project::new("p", "Captions", None),
            vec![Track::new("t", "p", TrackType::Text, "Text")],
            vec![KeyFrame::text("k", "t", f64::from(start), f64::from(length), TextOverlay::new("x"))],
            vec![],
        );
        let plan = plan_composition(&composition).unwrap();
        let layer = &plan.layers[0];
        prop_assert!(layer.duration_in_frames > 0);

        for frame in [layer.start_frame, layer.end_frame() - 1] {
            prop_assert_eq!(active_layers(&plan, frame).count(), 1);
        }
        prop_assert_eq!(active_layers(&plan, layer.end_frame()).count(), 0);
        if layer.start_frame > 0 {
            prop_assert_eq!(active_layers(&plan, layer.start_frame - 1).count(), 0);
        }
    }
}
