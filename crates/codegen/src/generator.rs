//! Producers of the default boilerplate that the scaffolder then rewrites.

use crate::store::FileStore;
use crate::templates::{context_for, namespace_for, render_template, CONTROLLER_STUB, MIGRATION_STUB, MODEL_STUB, REQUEST_STUB};
use api_scaffold_core::{ArtifactKind, ProjectLayout, ResourceName, ScaffoldError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Creates base files at their conventional paths.
///
/// Every method returns the project-relative path of the primary file it
/// created. `make_model` also creates the create-table migration.
pub trait CodeGenerator {
    fn make_model(&self, name: &ResourceName) -> Result<PathBuf, ScaffoldError>;

    fn make_request(&self, class_name: &str) -> Result<PathBuf, ScaffoldError>;

    fn make_controller(&self, name: &ResourceName) -> Result<PathBuf, ScaffoldError>;
}

/// Delegates to the host framework's `artisan` generators.
///
/// `artisan make:*` always writes to the framework's default directories, so
/// this generator only accepts `ProjectLayout::default()`.
#[derive(Debug, Clone)]
pub struct ArtisanGenerator {
    project_root: PathBuf,
    layout: ProjectLayout,
    php: String,
}

impl ArtisanGenerator {
    pub fn new(project_root: impl Into<PathBuf>, layout: ProjectLayout) -> Result<Self, ScaffoldError> {
        let defaults = ProjectLayout::default();
        let customized: Vec<&str> = [
            ("models_dir", layout.models_dir != defaults.models_dir),
            ("requests_dir", layout.requests_dir != defaults.requests_dir),
            ("controllers_dir", layout.controllers_dir != defaults.controllers_dir),
            ("migrations_dir", layout.migrations_dir != defaults.migrations_dir),
        ]
        .into_iter()
        .filter(|(_, differs)| *differs)
        .map(|(field, _)| field)
        .collect();

        if !customized.is_empty() {
            return Err(ScaffoldError::Config(format!(
                "the artisan generator always writes to the framework's default directories, \
                 but the layout customizes {}; use the stub generator for custom layouts",
                customized.join(", ")
            )));
        }

        Ok(Self {
            project_root: project_root.into(),
            layout,
            php: "php".to_string(),
        })
    }

    pub fn with_php(mut self, php: impl Into<String>) -> Self {
        self.php = php.into();
        self
    }

    fn artisan(&self, kind: ArtifactKind, args: &[&str]) -> Result<(), ScaffoldError> {
        tracing::debug!(php = %self.php, ?args, "running artisan");
        let output = Command::new(&self.php)
            .arg("artisan")
            .args(args)
            .current_dir(&self.project_root)
            .output()
            .map_err(|e| ScaffoldError::generation_failed(kind, format!("failed to run {} artisan: {}", self.php, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(ScaffoldError::generation_failed(
                kind,
                format!("artisan {} exited with {}: {}", args.join(" "), output.status, detail.trim()),
            ));
        }
        Ok(())
    }
}

impl CodeGenerator for ArtisanGenerator {
    fn make_model(&self, name: &ResourceName) -> Result<PathBuf, ScaffoldError> {
        self.artisan(ArtifactKind::Model, &["make:model", name.studly(), "-m"])?;
        Ok(self.layout.model_path(name))
    }

    fn make_request(&self, class_name: &str) -> Result<PathBuf, ScaffoldError> {
        self.artisan(request_kind(class_name), &["make:request", class_name])?;
        Ok(self.layout.request_path(class_name))
    }

    fn make_controller(&self, name: &ResourceName) -> Result<PathBuf, ScaffoldError> {
        let target = format!("API/{}", name.controller());
        self.artisan(ArtifactKind::Controller, &["make:controller", &target, "--api"])?;
        Ok(self.layout.controller_path(name))
    }
}

/// Writes the framework's default stubs directly, without a PHP toolchain.
pub struct StubGenerator<'a> {
    store: &'a dyn FileStore,
    layout: &'a ProjectLayout,
    timestamp: Option<String>,
}

impl<'a> StubGenerator<'a> {
    pub fn new(store: &'a dyn FileStore, layout: &'a ProjectLayout) -> Self {
        Self {
            store,
            layout,
            timestamp: None,
        }
    }

    /// Fix the migration timestamp instead of reading the clock.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    fn timestamp(&self) -> String {
        self.timestamp
            .clone()
            .unwrap_or_else(|| migration_timestamp(chrono::Local::now()))
    }

    fn write(&self, kind: ArtifactKind, path: &Path, content: &str) -> Result<(), ScaffoldError> {
        if self.store.exists(path) {
            return Err(ScaffoldError::generation_failed(
                kind,
                format!("{} already exists", path.display()),
            ));
        }
        self.store
            .write(path, content)
            .map_err(|e| ScaffoldError::generation_failed(kind, format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "wrote stub");
        Ok(())
    }
}

impl CodeGenerator for StubGenerator<'_> {
    fn make_model(&self, name: &ResourceName) -> Result<PathBuf, ScaffoldError> {
        let context = context_for(name, self.layout);

        let model_path = self.layout.model_path(name);
        self.write(ArtifactKind::Model, &model_path, &render_template(MODEL_STUB, &context)?)?;

        let migration_path = self.layout.migration_path(name, &self.timestamp());
        self.write(ArtifactKind::Migration, &migration_path, &render_template(MIGRATION_STUB, &context)?)?;

        Ok(model_path)
    }

    fn make_request(&self, class_name: &str) -> Result<PathBuf, ScaffoldError> {
        let mut context = HashMap::new();
        context.insert("class", class_name.to_string());
        context.insert("request_namespace", namespace_for(&self.layout.requests_dir));

        let path = self.layout.request_path(class_name);
        self.write(request_kind(class_name), &path, &render_template(REQUEST_STUB, &context)?)?;
        Ok(path)
    }

    fn make_controller(&self, name: &ResourceName) -> Result<PathBuf, ScaffoldError> {
        let path = self.layout.controller_path(name);
        self.write(ArtifactKind::Controller, &path, &render_template(CONTROLLER_STUB, &context_for(name, self.layout))?)?;
        Ok(path)
    }
}

fn request_kind(class_name: &str) -> ArtifactKind {
    if class_name.ends_with("UpdateRequest") {
        ArtifactKind::UpdateRequest
    } else {
        ArtifactKind::StoreRequest
    }
}

/// `Y_m_d_His`, the prefix the host framework gives migration files.
pub fn migration_timestamp<Tz: chrono::TimeZone>(at: chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y_%m_%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryFileStore;
    use chrono::TimeZone;

    #[test]
    fn test_migration_timestamp_format() {
        let at = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(migration_timestamp(at), "2024_03_09_070501");
    }

    #[test]
    fn test_stub_generator_writes_model_and_migration() {
        let store = MemoryFileStore::new();
        let layout = ProjectLayout::default();
        let generator = StubGenerator::new(&store, &layout).with_timestamp("2024_03_09_070501");
        let name = ResourceName::parse("Invoice").unwrap();

        let path = generator.make_model(&name).unwrap();
        assert_eq!(path, PathBuf::from("app/Models/Invoice.php"));
        assert!(store.get(&path).unwrap().contains("class Invoice extends Model"));

        let migration = store
            .get("database/migrations/2024_03_09_070501_create_invoices_table.php")
            .unwrap();
        assert!(migration.contains("Schema::create('invoices'"));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_stub_generator_refuses_to_overwrite() {
        let store = MemoryFileStore::new().with_file("app/Http/Requests/InvoiceStoreRequest.php", "custom");
        let layout = ProjectLayout::default();
        let generator = StubGenerator::new(&store, &layout);

        let err = generator.make_request("InvoiceStoreRequest").unwrap_err();
        assert!(matches!(err, ScaffoldError::GenerationFailed { kind: ArtifactKind::StoreRequest, .. }));
        assert_eq!(store.get("app/Http/Requests/InvoiceStoreRequest.php").unwrap(), "custom");
    }

    #[test]
    fn test_artisan_generator_reports_missing_php() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let generator = ArtisanGenerator::new(temp_dir.path(), ProjectLayout::default())
            .unwrap()
            .with_php("definitely-not-a-php-binary");
        let name = ResourceName::parse("Invoice").unwrap();
        let err = generator.make_model(&name).unwrap_err();
        assert!(matches!(err, ScaffoldError::GenerationFailed { kind: ArtifactKind::Model, .. }));
    }

    #[test]
    fn test_artisan_generator_rejects_custom_layout() {
        let layout = ProjectLayout {
            models_dir: PathBuf::from("src/Domain/Models"),
            migrations_dir: PathBuf::from("db/migrations"),
            ..ProjectLayout::default()
        };

        let err = ArtisanGenerator::new("/tmp/project", layout).unwrap_err();
        match err {
            ScaffoldError::Config(message) => {
                assert!(message.contains("models_dir, migrations_dir"));
                assert!(message.contains("stub generator"));
            }
            other => panic!("expected Config, got {:?}", other),
        }
    }
}
