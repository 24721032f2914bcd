pub mod commands;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use explainer_core::ExplainerConfig;

/// Load the explainer config from `path`, or defaults when no path is given.
///
/// A missing `api_key` is filled from `OPENAI_API_KEY`.
pub fn load_config(path: Option<&Path>) -> Result<ExplainerConfig> {
    let config = match path {
        Some(path) => ExplainerConfig::load(path)
            .with_context(|| format!("Failed to load config at {}", path.display()))?,
        None => ExplainerConfig::default(),
    };
    Ok(config.with_env_api_key())
}

/// Parse an address given as `0x`-prefixed hex or plain decimal.
pub fn parse_address(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|_| anyhow!("Invalid address '{}': expected 0x-prefixed hex or decimal", text))
}
