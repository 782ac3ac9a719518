use crate::interactive::Format;
use anyhow::Context;
use api_scaffold_core::ProjectLayout;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct LayoutEntry {
    field: &'static str,
    value: String,
    source: String,
}

fn entries(root: &Path, config: Option<&Path>) -> anyhow::Result<Vec<LayoutEntry>> {
    let resolved = ProjectLayout::resolve(root, config).context("failed to resolve project layout")?;
    let layout = &resolved.layout;

    let values = [
        ("models_dir", &layout.models_dir),
        ("requests_dir", &layout.requests_dir),
        ("controllers_dir", &layout.controllers_dir),
        ("migrations_dir", &layout.migrations_dir),
    ];

    Ok(values
        .into_iter()
        .map(|(field, value)| LayoutEntry {
            field,
            value: value.display().to_string(),
            source: resolved
                .sources
                .get(field)
                .map(ToString::to_string)
                .unwrap_or_default(),
        })
        .collect())
}

pub fn show(root: &Path, config: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let entries = entries(root, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    Format::info(&format!("Project layout for {}", root.display()));
    let width = entries.iter().map(|e| e.field.len()).max().unwrap_or(0);
    for entry in &entries {
        println!("  {:width$}  {}  ({})", entry.field, entry.value, entry.source, width = width);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entries_report_file_values() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(api_scaffold_core::LAYOUT_FILE_NAME),
            "[layout]\ncontrollers_dir = \"app/Http/Controllers/Api/V1\"\n",
        )
        .unwrap();

        let entries = entries(temp_dir.path(), None).unwrap();
        let controllers = entries.iter().find(|e| e.field == "controllers_dir").unwrap();
        assert_eq!(controllers.value, "app/Http/Controllers/Api/V1");
        assert!(controllers.source.starts_with("Configuration file:"));
    }
}
