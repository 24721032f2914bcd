use std::path::Path;

use anyhow::{Context, Result};
use explainer_core::analysis::{collect_classes, ClassIndex, InclusionPolicy};
use explainer_core::host::{Document, SnapshotDocument};

use crate::load_config;

/// Group the snapshot's method labels by class without contacting any backend.
pub fn collect_snapshot_classes(
    snapshot: &Path,
    config_path: Option<&Path>,
    class: Option<&str>,
) -> Result<ClassIndex> {
    let config = load_config(config_path)?;
    let doc = SnapshotDocument::load(snapshot)
        .with_context(|| format!("Failed to load host snapshot at {}", snapshot.display()))?;
    let Some(segment) = doc.text_segment(&config.text_segment) else {
        return Ok(ClassIndex::default());
    };
    let policy = InclusionPolicy::from_config(&config).with_class_filter(class);
    Ok(collect_classes(segment, &policy))
}

/// List classes and their accepted methods.
pub fn list_classes_command(
    snapshot: &Path,
    config_path: Option<&Path>,
    class: Option<&str>,
    json: bool,
) -> Result<()> {
    let index = collect_snapshot_classes(snapshot, config_path, class)?;

    if json {
        let serialized =
            serde_json::to_string_pretty(&index).context("Failed to serialize classes to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Classes ({}), methods ({}):", index.groups.len(), index.total_methods);
    if index.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for group in &index.groups {
        println!("  - {} ({})", group.class_name, group.members.len());
        for member in &group.members {
            println!("      0x{:X} {}", member.entry_address, member.label_name);
        }
    }

    Ok(())
}
