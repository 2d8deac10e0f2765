//! Validate a composition snapshot.

use std::path::PathBuf;

use reelplan_common::config::AppConfig;
use reelplan_render_engine::{planner::check_composition, preload_urls, PlanOptions};

pub fn run(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    println!("Validating composition at: {}", path.display());

    let composition = super::load_composition(&path)?;
    let options = PlanOptions::from_config(&config.planning);

    println!("  Project: {}", composition.project.id);
    println!("  Tracks: {}", composition.tracks.len());
    println!("  Keyframes: {}", composition.keyframe_count());
    println!("  Media items: {}", composition.media_items.len());

    let structural = check_composition(&composition, &options);
    let dangling = composition.dangling_media();

    let not_ready = composition
        .media_items
        .values()
        .filter(|item| !item.is_completed())
        .count();
    if not_ready > 0 {
        println!("  Media still generating: {not_ready}");
    }
    println!("  Preloadable media: {}", preload_urls(&composition).len());

    if structural.is_empty() && dangling.is_empty() {
        println!("\nComposition is valid.");
        return Ok(());
    }

    if !structural.is_empty() {
        println!("\nStructural issues:");
        for issue in &structural.issues {
            println!("  - {issue}");
        }
    }
    if !dangling.is_empty() {
        println!("\nUnresolved media (blocks export, not preview):");
        for issue in &dangling.issues {
            println!("  - {issue}");
        }
    }

    if structural.is_empty() {
        println!("\n{} export issue(s) found.", dangling.len());
        Ok(())
    } else {
        anyhow::bail!("{} structural issue(s) found", structural.len())
    }
}
