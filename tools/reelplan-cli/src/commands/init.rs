//! Create a new empty composition.

use std::path::PathBuf;

use reelplan_project_model::{AspectRatio, Composition, Project};

pub fn run(
    project_id: String,
    title: String,
    aspect: Option<String>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let aspect_ratio = match aspect.as_deref() {
        Some(value) => Some(
            AspectRatio::parse(value)
                .ok_or_else(|| anyhow::anyhow!("Unsupported aspect ratio: {value}"))?,
        ),
        None => None,
    };

    let composition = Composition::with_project(Project::new(&project_id, title, aspect_ratio));
    let path = output.join(format!("{project_id}.json"));
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    composition
        .save(&path)
        .map_err(|e| anyhow::anyhow!("Failed to create composition: {e}"))?;

    let size = composition.project.frame_size();
    println!("Composition created: {}", path.display());
    println!("  Project: {project_id}");
    println!("  Frame size: {}x{}", size.width, size.height);

    Ok(())
}
