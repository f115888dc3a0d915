//! Show or save the effective configuration.

use eyeframe_common::config::AppConfig;

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        let path = config
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to save config: {e}"))?;
        tracing::info!(path = %path.display(), "Config saved");
    }

    Ok(())
}
