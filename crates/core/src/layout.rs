//! Project layout configuration.
//!
//! Resolution order, later sources winning: built-in defaults, the
//! `[layout]` table of `api-scaffold.toml`, then `API_SCAFFOLD_*_DIR`
//! environment variables.

use crate::error::ScaffoldError;
use crate::resource::ResourceName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

pub const LAYOUT_FILE_NAME: &str = "api-scaffold.toml";

const FIELDS: [(&str, &str); 4] = [
    ("models_dir", "API_SCAFFOLD_MODELS_DIR"),
    ("requests_dir", "API_SCAFFOLD_REQUESTS_DIR"),
    ("controllers_dir", "API_SCAFFOLD_CONTROLLERS_DIR"),
    ("migrations_dir", "API_SCAFFOLD_MIGRATIONS_DIR"),
];

/// Where each artifact kind lives, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLayout {
    pub models_dir: PathBuf,
    pub requests_dir: PathBuf,
    pub controllers_dir: PathBuf,
    pub migrations_dir: PathBuf,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("app/Models"),
            requests_dir: PathBuf::from("app/Http/Requests"),
            controllers_dir: PathBuf::from("app/Http/Controllers/API"),
            migrations_dir: PathBuf::from("database/migrations"),
        }
    }
}

/// Configuration source information for `-v` diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value loaded from environment variable
    EnvVar(String),
    /// Default value used
    Default,
    /// Value loaded from file
    File(String),
}

impl ConfigSource {
    pub fn description(&self) -> String {
        match self {
            ConfigSource::EnvVar(var) => format!("Environment variable: {}", var),
            ConfigSource::Default => "Default value".to_string(),
            ConfigSource::File(path) => format!("Configuration file: {}", path),
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[derive(Debug, Default, Deserialize)]
struct LayoutFile {
    #[serde(default)]
    layout: PartialLayout,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialLayout {
    models_dir: Option<PathBuf>,
    requests_dir: Option<PathBuf>,
    controllers_dir: Option<PathBuf>,
    migrations_dir: Option<PathBuf>,
}

/// A layout together with where each of its values came from.
#[derive(Debug, Clone)]
pub struct ResolvedLayout {
    pub layout: ProjectLayout,
    pub sources: BTreeMap<&'static str, ConfigSource>,
}

impl ProjectLayout {
    /// Resolve the layout for `project_root`, reading the process environment.
    ///
    /// `config_file` overrides the default `<root>/api-scaffold.toml`; an
    /// explicit file must exist, the default one is optional.
    pub fn resolve(project_root: &Path, config_file: Option<&Path>) -> Result<ResolvedLayout, ScaffoldError> {
        Self::resolve_with(project_root, config_file, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(
        project_root: &Path,
        config_file: Option<&Path>,
        env: F,
    ) -> Result<ResolvedLayout, ScaffoldError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layout = ProjectLayout::default();
        let mut sources: BTreeMap<&'static str, ConfigSource> =
            FIELDS.iter().map(|(field, _)| (*field, ConfigSource::Default)).collect();

        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (project_root.join(LAYOUT_FILE_NAME), false),
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let file: LayoutFile = toml::from_str(&content)?;
            let origin = path.display().to_string();
            tracing::debug!(config = %origin, "loaded layout configuration");

            let partial = file.layout;
            for (field, value) in [
                ("models_dir", partial.models_dir),
                ("requests_dir", partial.requests_dir),
                ("controllers_dir", partial.controllers_dir),
                ("migrations_dir", partial.migrations_dir),
            ] {
                if let Some(value) = value {
                    *layout.field_mut(field) = value;
                    sources.insert(field, ConfigSource::File(origin.clone()));
                }
            }
        } else if required {
            return Err(ScaffoldError::Config(format!(
                "configuration file {} does not exist",
                path.display()
            )));
        }

        for (field, var) in FIELDS {
            if let Some(value) = env(var).filter(|v| !v.trim().is_empty()) {
                *layout.field_mut(field) = PathBuf::from(value.trim());
                sources.insert(field, ConfigSource::EnvVar(var.to_string()));
            }
        }

        layout.validate()?;
        Ok(ResolvedLayout { layout, sources })
    }

    /// Every directory must be a non-empty path inside the project root.
    pub fn validate(&self) -> Result<(), ScaffoldError> {
        for (field, _) in FIELDS {
            let dir = self.field(field);
            if dir.as_os_str().is_empty() {
                return Err(ScaffoldError::Config(format!("{} must not be empty", field)));
            }
            if dir.is_absolute()
                || dir
                    .components()
                    .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_) | Component::RootDir))
            {
                return Err(ScaffoldError::Config(format!(
                    "{} must be relative to the project root, got {}",
                    field,
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    pub fn model_path(&self, name: &ResourceName) -> PathBuf {
        self.models_dir.join(format!("{}.php", name.studly()))
    }

    /// Planned migration path; `timestamp` uses the `Y_m_d_His` convention.
    pub fn migration_path(&self, name: &ResourceName, timestamp: &str) -> PathBuf {
        self.migrations_dir
            .join(format!("{}_{}.php", timestamp, name.migration_token()))
    }

    pub fn request_path(&self, class_name: &str) -> PathBuf {
        self.requests_dir.join(format!("{}.php", class_name))
    }

    pub fn controller_path(&self, name: &ResourceName) -> PathBuf {
        self.controllers_dir.join(format!("{}.php", name.controller()))
    }

    fn field(&self, field: &str) -> &PathBuf {
        match field {
            "models_dir" => &self.models_dir,
            "requests_dir" => &self.requests_dir,
            "controllers_dir" => &self.controllers_dir,
            _ => &self.migrations_dir,
        }
    }

    fn field_mut(&mut self, field: &str) -> &mut PathBuf {
        match field {
            "models_dir" => &mut self.models_dir,
            "requests_dir" => &mut self.requests_dir,
            "controllers_dir" => &mut self.controllers_dir,
            _ => &mut self.migrations_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let resolved = ProjectLayout::resolve_with(temp_dir.path(), None, no_env).unwrap();
        assert_eq!(resolved.layout, ProjectLayout::default());
        assert!(resolved.sources.values().all(|s| *s == ConfigSource::Default));
    }

    #[test]
    fn test_file_overrides_defaults_and_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(LAYOUT_FILE_NAME),
            "[layout]\nmodels_dir = \"src/Domain/Models\"\nmigrations_dir = \"db/migrations\"\n",
        )
        .unwrap();

        let env = |key: &str| (key == "API_SCAFFOLD_MIGRATIONS_DIR").then(|| "sql/migrations".to_string());
        let resolved = ProjectLayout::resolve_with(temp_dir.path(), None, env).unwrap();

        assert_eq!(resolved.layout.models_dir, PathBuf::from("src/Domain/Models"));
        assert_eq!(resolved.layout.migrations_dir, PathBuf::from("sql/migrations"));
        assert_eq!(resolved.layout.requests_dir, PathBuf::from("app/Http/Requests"));
        assert!(matches!(resolved.sources["models_dir"], ConfigSource::File(_)));
        assert_eq!(
            resolved.sources["migrations_dir"],
            ConfigSource::EnvVar("API_SCAFFOLD_MIGRATIONS_DIR".to_string())
        );
        assert_eq!(resolved.sources["controllers_dir"], ConfigSource::Default);
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        let result = ProjectLayout::resolve_with(temp_dir.path(), Some(&missing), no_env);
        assert!(matches!(result, Err(ScaffoldError::Config(_))));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(LAYOUT_FILE_NAME), "[layout]\nviews_dir = \"x\"\n").unwrap();
        let result = ProjectLayout::resolve_with(temp_dir.path(), None, no_env);
        assert!(matches!(result, Err(ScaffoldError::Toml(_))));
    }

    #[test]
    fn test_validate_rejects_escaping_paths() {
        let mut layout = ProjectLayout::default();
        layout.models_dir = PathBuf::from("../elsewhere");
        assert!(matches!(layout.validate(), Err(ScaffoldError::Config(_))));

        layout.models_dir = PathBuf::from("/abs/Models");
        assert!(matches!(layout.validate(), Err(ScaffoldError::Config(_))));

        layout.models_dir = PathBuf::new();
        assert!(matches!(layout.validate(), Err(ScaffoldError::Config(_))));
    }

    #[test]
    fn test_artifact_paths() {
        let layout = ProjectLayout::default();
        let name = ResourceName::parse("Invoice").unwrap();
        assert_eq!(layout.model_path(&name), PathBuf::from("app/Models/Invoice.php"));
        assert_eq!(
            layout.migration_path(&name, "2024_01_02_030405"),
            PathBuf::from("database/migrations/2024_01_02_030405_create_invoices_table.php")
        );
        assert_eq!(
            layout.request_path(&name.store_request()),
            PathBuf::from("app/Http/Requests/InvoiceStoreRequest.php")
        );
        assert_eq!(
            layout.controller_path(&name),
            PathBuf::from("app/Http/Controllers/API/InvoiceController.php")
        );
    }

    #[test]
    #[serial]
    fn test_resolve_reads_process_environment() {
        let temp_dir = TempDir::new().unwrap();
        std::env::set_var("API_SCAFFOLD_REQUESTS_DIR", "app/Requests");
        let resolved = ProjectLayout::resolve(temp_dir.path(), None);
        std::env::remove_var("API_SCAFFOLD_REQUESTS_DIR");

        let resolved = resolved.unwrap();
        assert_eq!(resolved.layout.requests_dir, PathBuf::from("app/Requests"));
    }
}
