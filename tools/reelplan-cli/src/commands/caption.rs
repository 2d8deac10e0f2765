//! Append a text overlay to a composition.

use std::path::PathBuf;

use reelplan_project_model::TextOverlay;

pub fn run(path: PathBuf, track: String, text: String, id: Option<String>) -> anyhow::Result<()> {
    if text.is_empty() {
        anyhow::bail!("Caption text must not be empty");
    }

    let mut composition = super::load_composition(&path)?;
    let id = id.unwrap_or_else(|| format!("text-{}", chrono::Utc::now().timestamp_millis()));

    let added = composition
        .append_text_overlay(&track, id, TextOverlay::new(text))
        .map_err(|e| anyhow::anyhow!("Failed to add caption: {e}"))?;
    let (id, start, length) = (added.id.clone(), added.timestamp, added.duration);

    composition
        .save(&path)
        .map_err(|e| anyhow::anyhow!("Failed to save composition: {e}"))?;

    tracing::info!(keyframe = %id, track = %track, "Caption added");
    println!("Caption added: {id}");
    println!("  Track: {track}");
    println!("  Starts at: {:.3}s", start / 1000.0);
    println!("  Length: {:.1}s", length / 1000.0);

    Ok(())
}
