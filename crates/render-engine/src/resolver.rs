//! Media readiness and timing.
//!
//! Pure functions over a media item snapshot. A media item that is not
//! ready yet is a normal state while generation jobs run, so these
//! functions report absence rather than failing.

use std::collections::HashSet;

use reelplan_project_model::{Composition, MediaItem, MediaType};

/// Playable length assumed for media that carries no timing metadata.
///
/// Applies to every keyframe with no explicit duration whose media does
/// not report one, and to text keyframes without a duration.
pub const FALLBACK_DURATION_MS: f64 = 5000.0;

/// Locations inside a provider's job output that may hold a playable URL,
/// in lookup order.
const OUTPUT_URL_POINTERS: &[&str] = &[
    "/video/url",
    "/images/0/url",
    "/image/url",
    "/audio_file/url",
    "/audio/url",
    "/audio_url/url",
];

/// Playable URL for a completed media item.
///
/// The item's own `url` wins over anything in its job output. Returns
/// `None` for items that are not completed or have no usable URL yet.
pub fn resolve_url(media: &MediaItem) -> Option<&str> {
    if !media.is_completed() {
        return None;
    }

    if let Some(url) = media.url.as_deref().filter(|url| !url.is_empty()) {
        return Some(url);
    }

    let output = media.output.as_ref()?;
    OUTPUT_URL_POINTERS
        .iter()
        .filter_map(|pointer| output.pointer(pointer))
        .filter_map(serde_json::Value::as_str)
        .find(|url| !url.is_empty())
}

/// Playable length of a media item in milliseconds, falling back to
/// [`FALLBACK_DURATION_MS`] when the item does not report a usable one.
pub fn resolve_duration(media: &MediaItem) -> f64 {
    media
        .duration
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .unwrap_or(FALLBACK_DURATION_MS)
}

/// URLs a player should warm before playback: completed video and audio
/// media that at least one keyframe references. Deduplicated, in order of
/// first reference (tracks in declaration order).
pub fn preload_urls(composition: &Composition) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for track in &composition.tracks {
        for frame in composition.frames_for(&track.id) {
            let Some(media_id) = frame.data.media_id() else {
                continue;
            };
            let Some(media) = composition.media(media_id) else {
                continue;
            };
            if !matches!(
                media.media_type,
                MediaType::Video | MediaType::Music | MediaType::Voiceover
            ) {
                continue;
            }
            if let Some(url) = resolve_url(media) {
                if seen.insert(url) {
                    urls.push(url.to_string());
                }
            }
        }
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelplan_project_model::{KeyFrame, MediaStatus, Project, Track, TrackType};
    use serde_json::json;

    fn generated(id: &str, media_type: MediaType, output: serde_json::Value) -> MediaItem {
        let mut item = MediaItem::pending(id, media_type);
        item.status = MediaStatus::Completed;
        item.output = Some(output);
        item
    }

    #[test]
    fn test_direct_url_wins() {
        let mut item = generated("m1", MediaType::Video, json!({"video": {"url": "https://out/v.mp4"}}));
        item.url = Some("https://direct/v.mp4".into());
        assert_eq!(resolve_url(&item), Some("https://direct/v.mp4"));
    }

    #[test]
    fn test_output_lookup_order() {
        let image = generated("m2", MediaType::Image, json!({"images": [{"url": "https://out/0.png"}]}));
        assert_eq!(resolve_url(&image), Some("https://out/0.png"));

        let speech = generated("m3", MediaType::Voiceover, json!({"audio_url": {"url": "https://out/vo.mp3"}}));
        assert_eq!(resolve_url(&speech), Some("https://out/vo.mp3"));

        let both = generated(
            "m4",
            MediaType::Music,
            json!({"audio": {"url": "https://out/b.mp3"}, "audio_file": {"url": "https://out/a.mp3"}}),
        );
        assert_eq!(resolve_url(&both), Some("https://out/a.mp3"));
    }

    #[test]
    fn test_unready_media_has_no_url() {
        let mut item = MediaItem::pending("m1", MediaType::Video);
        item.url = Some("https://direct/v.mp4".into());
        assert_eq!(resolve_url(&item), None);

        item.status = MediaStatus::Failed;
        assert_eq!(resolve_url(&item), None);
    }

    #[test]
    fn test_completed_media_without_url_has_no_url() {
        let item = generated("m1", MediaType::Video, json!({"video": {"url": ""}}));
        assert_eq!(resolve_url(&item), None);

        let mut empty_direct = MediaItem::completed("m2", MediaType::Image, "", None);
        assert_eq!(resolve_url(&empty_direct), None);
        empty_direct.output = Some(json!({"image": {"url": "https://out/i.png"}}));
        assert_eq!(resolve_url(&empty_direct), Some("https://out/i.png"));
    }

    #[test]
    fn test_resolve_duration_falls_back() {
        let mut item = MediaItem::completed("m1", MediaType::Music, "https://a", Some(12_500.0));
        assert_eq!(resolve_duration(&item), 12_500.0);

        item.duration = None;
        assert_eq!(resolve_duration(&item), FALLBACK_DURATION_MS);

        item.duration = Some(0.0);
        assert_eq!(resolve_duration(&item), FALLBACK_DURATION_MS);
    }

    #[test]
    fn test_preload_urls_only_referenced_playable_media() {
        let project = Project::new("p1", "Demo", None);
        let tracks = vec![
            Track::new("v", "p1", TrackType::Video, "Video"),
            Track::new("a", "p1", TrackType::Music, "Music"),
        ];
        let keyframes = vec![
            KeyFrame::media("k1", "v", 0.0, 0.0, "video"),
            KeyFrame::media("k2", "v", 5000.0, 0.0, "video"),
            KeyFrame::media("k3", "v", 9000.0, 0.0, "still"),
            KeyFrame::media("k4", "a", 0.0, 0.0, "song"),
            KeyFrame::media("k5", "a", 0.0, 0.0, "pending"),
        ];
        let media = vec![
            MediaItem::completed("video", MediaType::Video, "https://v.mp4", None),
            MediaItem::completed("still", MediaType::Image, "https://i.png", None),
            MediaItem::completed("song", MediaType::Music, "https://s.mp3", None),
            MediaItem::completed("unused", MediaType::Music, "https://u.mp3", None),
            MediaItem::pending("pending", MediaType::Music),
        ];
        let (composition, _) = Composition::from_parts(project, tracks, keyframes, media);

        assert_eq!(
            preload_urls(&composition),
            vec!["https://v.mp4".to_string(), "https://s.mp3".to_string()]
        );
    }
}
