//! Show the layers active at one frame.

use std::path::PathBuf;

use reelplan_common::config::AppConfig;
use reelplan_render_engine::{compose_frame, ms_to_frame, plan_composition_with};

pub fn run(
    path: PathBuf,
    config: &AppConfig,
    frame: Option<u64>,
    at_ms: Option<f64>,
    allow_overlaps: bool,
) -> anyhow::Result<()> {
    let composition = super::load_composition(&path)?;
    let plan = plan_composition_with(&composition, &super::plan_options(config, allow_overlaps))?;

    let frame = match (frame, at_ms) {
        (Some(frame), _) => frame,
        (None, Some(ms)) => ms_to_frame(ms, plan.fps),
        (None, None) => anyhow::bail!("either --frame or --at-ms is required"),
    };

    if frame >= plan.duration_in_frames {
        tracing::warn!(
            frame,
            duration = plan.duration_in_frames,
            "Frame is past the end of the composition"
        );
    }

    let composition = compose_frame(&plan, frame);
    println!("{}", serde_json::to_string_pretty(&composition)?);

    Ok(())
}
