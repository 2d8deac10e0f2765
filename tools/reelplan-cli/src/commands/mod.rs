pub mod caption;
pub mod config;
pub mod export;
pub mod frame;
pub mod info;
pub mod init;
pub mod plan;
pub mod preview;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use reelplan_common::config::AppConfig;
use reelplan_project_model::Composition;
use reelplan_render_engine::PlanOptions;

/// Load a composition snapshot from disk.
pub fn load_composition(path: &Path) -> anyhow::Result<Composition> {
    Composition::load(path)
        .with_context(|| format!("Failed to load composition from {}", path.display()))
}

/// Planner options from config, with the command-line override applied.
pub fn plan_options(config: &AppConfig, allow_overlaps: bool) -> PlanOptions {
    let mut planning = config.planning.clone();
    planning.allow_overlaps |= allow_overlaps;
    PlanOptions::from_config(&planning)
}
