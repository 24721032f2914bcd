use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use explainer_core::ExplainerConfig;

/// Write the default configuration to `path`.
///
/// Refuses to clobber an existing file unless `force` is set.
pub fn init_config_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&ExplainerConfig::default())?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;

    println!("Wrote default config:");
    println!("  Path: {}", path.display());
    println!("  API key: set \"api_key\" or the {} env var", explainer_core::config::API_KEY_ENV);

    Ok(())
}
