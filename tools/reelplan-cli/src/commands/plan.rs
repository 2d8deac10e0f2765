//! Plan a composition and print the result.

use std::path::PathBuf;

use reelplan_common::config::AppConfig;
use reelplan_render_engine::plan_composition_with;

pub fn run(path: PathBuf, config: &AppConfig, allow_overlaps: bool, pretty: bool) -> anyhow::Result<()> {
    let composition = super::load_composition(&path)?;
    let plan = plan_composition_with(&composition, &super::plan_options(config, allow_overlaps))?;

    let json = if pretty {
        serde_json::to_string_pretty(&plan)?
    } else {
        serde_json::to_string(&plan)?
    };
    println!("{json}");

    Ok(())
}
