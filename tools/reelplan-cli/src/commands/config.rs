//! Show or persist the effective configuration.

use reelplan_common::config::AppConfig;

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        config
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;
        tracing::info!("Configuration saved");
    }

    Ok(())
}
