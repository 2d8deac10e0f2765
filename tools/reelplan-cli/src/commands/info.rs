//! Show composition information.

use std::path::PathBuf;

use reelplan_project_model::TrackType;
use reelplan_render_engine::planner::{composition_duration_frames, sort_tracks};
use reelplan_render_engine::{preload_urls, FPS};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let composition = super::load_composition(&path)?;
    let project = &composition.project;
    let size = project.frame_size();

    println!("Project: {}", project.title);
    println!("  ID: {}", project.id);
    println!("  Created: {}", format_created(project.created_at));
    if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  Description: {description}");
    }
    println!(
        "  Aspect: {}",
        project.aspect_ratio.map(|a| a.as_str()).unwrap_or("default")
    );
    println!("  Frame size: {}x{} @ {}fps", size.width, size.height, FPS);

    let frames = composition_duration_frames(&composition);
    println!(
        "  Duration: {:.1}s ({} frames)",
        frames as f64 / f64::from(FPS),
        frames
    );
    println!();

    println!("Tracks (layer order):");
    for track in sort_tracks(&composition.tracks) {
        let kind = match track.track_type {
            TrackType::Video => "video",
            TrackType::Music => "music",
            TrackType::Voiceover => "voiceover",
            TrackType::Text => "text",
            TrackType::Unknown => "unknown",
        };
        println!(
            "  {} [{}] {}: {} keyframe(s){}",
            track.id,
            kind,
            track.label,
            composition.frames_for(&track.id).len(),
            if track.locked { " (locked)" } else { "" }
        );
    }
    println!();

    let ready = composition
        .media_items
        .values()
        .filter(|item| item.is_completed())
        .count();
    println!("Media:");
    println!("  Items: {}", composition.media_items.len());
    println!("  Ready: {ready}");
    for url in preload_urls(&composition) {
        println!("  Preload: {url}");
    }

    Ok(())
}

fn format_created(epoch_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| epoch_ms.to_string())
}
