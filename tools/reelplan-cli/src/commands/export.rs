//! Export a composition for out-of-process rendering.

use std::path::PathBuf;

use reelplan_common::config::AppConfig;
use reelplan_render_engine::{export_composition, JsonFileDispatcher};

pub fn run(path: PathBuf, config: &AppConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    let composition = super::load_composition(&path)?;

    let mut dispatcher = JsonFileDispatcher::from_defaults(&config.export);
    if let Some(output) = output {
        dispatcher = JsonFileDispatcher::new(output).pretty(config.export.pretty_json);
    }

    let receipt = export_composition(composition, &mut dispatcher)?;

    println!("Composition exported: {}", receipt.location);
    println!("  Project: {}", receipt.project_id);
    println!("  Tracks: {}", receipt.summary.tracks);
    println!("  Keyframes: {}", receipt.summary.keyframes);
    println!("  Media items: {}", receipt.summary.media_items);
    if receipt.summary.text_tracks > 0 {
        println!("  Text tracks: {}", receipt.summary.text_tracks);
    }

    Ok(())
}
