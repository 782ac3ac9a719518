use crate::generator::{migration_timestamp, CodeGenerator};
use crate::migration::{patch_migration, PatchOutcome};
use crate::store::FileStore;
use crate::templates::{render_controller, render_model, render_request};
use api_scaffold_core::{ArtifactKind, ProjectLayout, ResourceName, ScaffoldError};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

/// The files one `make:api` run will create or modify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldPlan {
    pub resource: ResourceName,
    pub files: Vec<PlannedFile>,
}

impl ScaffoldPlan {
    pub fn new(resource: ResourceName, layout: &ProjectLayout, timestamp: &str) -> Self {
        let files = ArtifactKind::ALL
            .iter()
            .map(|&kind| {
                let path = match kind {
                    ArtifactKind::Model => layout.model_path(&resource),
                    ArtifactKind::Migration => layout.migration_path(&resource, timestamp),
                    ArtifactKind::StoreRequest => layout.request_path(&resource.store_request()),
                    ArtifactKind::UpdateRequest => layout.request_path(&resource.update_request()),
                    ArtifactKind::Controller => layout.controller_path(&resource),
                };
                PlannedFile { path, kind }
            })
            .collect();

        Self { resource, files }
    }

    pub fn path_of(&self, kind: ArtifactKind) -> Option<&Path> {
        self.files
            .iter()
            .find(|file| file.kind == kind)
            .map(|file| file.path.as_path())
    }
}

/// Asks whether a plan may be carried out.
pub trait Confirmer {
    fn confirm(&self, plan: &ScaffoldPlan) -> Result<bool, ScaffoldError>;
}

impl<F> Confirmer for F
where
    F: Fn(&ScaffoldPlan) -> Result<bool, ScaffoldError>,
{
    fn confirm(&self, plan: &ScaffoldPlan) -> Result<bool, ScaffoldError> {
        self(plan)
    }
}

/// Confirms every plan; backs `--yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, _plan: &ScaffoldPlan) -> Result<bool, ScaffoldError> {
        Ok(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScaffoldReport {
    Cancelled,
    Completed {
        resource: ResourceName,
        created: Vec<PlannedFile>,
        migration: PatchOutcome,
    },
}

/// Runs `make:api` for one resource: plan, confirm, generate, rewrite, patch.
///
/// Generator failures stop the run immediately. Files written by earlier
/// steps stay where they are.
pub struct Scaffolder<'a> {
    layout: &'a ProjectLayout,
    store: &'a dyn FileStore,
    generator: &'a dyn CodeGenerator,
    timestamp: Option<String>,
}

impl<'a> Scaffolder<'a> {
    pub fn new(layout: &'a ProjectLayout, store: &'a dyn FileStore, generator: &'a dyn CodeGenerator) -> Self {
        Self {
            layout,
            store,
            generator,
            timestamp: None,
        }
    }

    /// Fix the timestamp shown for the planned migration.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn plan(&self, resource_name: &str) -> Result<ScaffoldPlan, ScaffoldError> {
        let resource = ResourceName::parse(resource_name)?;
        let timestamp = self
            .timestamp
            .clone()
            .unwrap_or_else(|| migration_timestamp(chrono::Local::now()));
        Ok(ScaffoldPlan::new(resource, self.layout, &timestamp))
    }

    pub fn run(&self, resource_name: &str, confirmer: &dyn Confirmer) -> Result<ScaffoldReport, ScaffoldError> {
        let plan = self.plan(resource_name)?;
        tracing::debug!(resource = %plan.resource, files = plan.files.len(), "planned scaffold");

        if !confirmer.confirm(&plan)? {
            tracing::info!(resource = %plan.resource, "scaffold cancelled");
            return Ok(ScaffoldReport::Cancelled);
        }

        let name = &plan.resource;
        let mut created = Vec::with_capacity(plan.files.len());

        let model = self.generate(ArtifactKind::Model, || self.generator.make_model(name))?;
        self.rewrite(&model, &render_model(name, self.layout)?)?;
        created.push(PlannedFile {
            path: model,
            kind: ArtifactKind::Model,
        });

        let migration = patch_migration(name, self.layout, self.store)?;
        match &migration {
            PatchOutcome::Patched { path, .. } => created.push(PlannedFile {
                path: path.clone(),
                kind: ArtifactKind::Migration,
            }),
            PatchOutcome::NotFound => tracing::warn!(
                token = %name.migration_token(),
                dir = %self.layout.migrations_dir.display(),
                "no migration found to patch"
            ),
        }

        for (kind, class_name) in [
            (ArtifactKind::StoreRequest, name.store_request()),
            (ArtifactKind::UpdateRequest, name.update_request()),
        ] {
            let path = self.generate(kind, || self.generator.make_request(&class_name))?;
            self.rewrite(&path, &render_request(&class_name, self.layout)?)?;
            created.push(PlannedFile { path, kind });
        }

        let controller = self.generate(ArtifactKind::Controller, || self.generator.make_controller(name))?;
        self.rewrite(&controller, &render_controller(name, self.layout)?)?;
        created.push(PlannedFile {
            path: controller,
            kind: ArtifactKind::Controller,
        });

        tracing::info!(resource = %name, files = created.len(), "scaffold completed");
        Ok(ScaffoldReport::Completed {
            resource: name.clone(),
            created,
            migration,
        })
    }

    fn generate<F>(&self, kind: ArtifactKind, call: F) -> Result<PathBuf, ScaffoldError>
    where
        F: FnOnce() -> Result<PathBuf, ScaffoldError>,
    {
        let path = call().map_err(|e| match e {
            ScaffoldError::GenerationFailed { .. } => e,
            other => ScaffoldError::generation_failed(kind, other.to_string()),
        })?;

        if !self.store.exists(&path) {
            return Err(ScaffoldError::generation_failed(
                kind,
                format!("generator reported success but {} was not created", path.display()),
            ));
        }

        tracing::info!(%kind, path = %path.display(), "generated");
        Ok(path)
    }

    fn rewrite(&self, path: &Path, content: &str) -> Result<(), ScaffoldError> {
        self.store.write(path, content)?;
        tracing::debug!(path = %path.display(), "rewrote from template");
        Ok(())
    }
}
