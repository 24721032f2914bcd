use anyhow::Result;
use serde::Serialize;

use explainer_core::services::explanation::default_backend_registry;
use explainer_core::ExplainerConfig;

#[derive(Debug, Serialize)]
pub struct BackendInfo {
    pub name: String,
    pub description: String,
}

/// List explanation backends compiled into this binary.
pub fn list_backends_command(json: bool) -> Result<()> {
    let registry = default_backend_registry(&ExplainerConfig::default());
    let entries: Vec<BackendInfo> = registry
        .names()
        .into_iter()
        .map(|name| {
            let description = match name.as_str() {
                "echo" => "Returns the prompt unchanged; no network access".to_string(),
                "openai" => {
                    "OpenAI-compatible chat completions (requires api_key or OPENAI_API_KEY)"
                        .to_string()
                }
                other => format!("Backend '{}'", other),
            };
            BackendInfo { name, description }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Backends: (none)");
        return Ok(());
    }

    println!("Backends:");
    for entry in entries {
        println!("- {}: {}", entry.name, entry.description);
    }

    Ok(())
}
