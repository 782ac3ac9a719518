pub mod generator;
pub mod migration;
pub mod scaffolder;
pub mod store;
pub mod templates;

pub use generator::{migration_timestamp, ArtisanGenerator, CodeGenerator, StubGenerator};
pub use migration::{patch_migration, MigrationDocument, PatchOutcome};
pub use scaffolder::{AssumeYes, Confirmer, PlannedFile, ScaffoldPlan, ScaffoldReport, Scaffolder};
pub use store::{FileStore, LocalFileStore, MemoryFileStore};
