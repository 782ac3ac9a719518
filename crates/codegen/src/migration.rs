//! Idempotent patching of generated create-table migrations.
//!
//! The patcher locates the migration the generator just wrote for a resource
//! and makes sure it declares a `name` column and soft deletes. Insertion is
//! anchored on whole lines: a new declaration goes on its own line directly
//! below the anchor, with the anchor's indentation and line ending. Nothing
//! else in the file is touched.

use crate::store::FileStore;
use api_scaffold_core::{ProjectLayout, ResourceName, ScaffoldError};
use serde::Serialize;
use std::io;
use std::path::PathBuf;

pub const PRIMARY_KEY_ANCHOR: &str = "$table->id();";
pub const NAME_COLUMN: &str = "$table->string('name');";
pub const TIMESTAMPS_ANCHOR: &str = "$table->timestamps();";
pub const SOFT_DELETES_COLUMN: &str = "$table->softDeletes();";

/// The text of one migration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationDocument {
    text: String,
}

impl MigrationDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn has_name_column(&self) -> bool {
        self.text.contains(NAME_COLUMN)
    }

    pub fn has_soft_deletes(&self) -> bool {
        self.text.contains(SOFT_DELETES_COLUMN)
    }

    /// Returns true when the column was inserted.
    pub fn ensure_name_column(&mut self) -> bool {
        if self.has_name_column() {
            return false;
        }
        self.insert_after(PRIMARY_KEY_ANCHOR, NAME_COLUMN)
    }

    /// Returns true when soft deletes were inserted.
    pub fn ensure_soft_deletes(&mut self) -> bool {
        if self.has_soft_deletes() {
            return false;
        }
        self.insert_after(TIMESTAMPS_ANCHOR, SOFT_DELETES_COLUMN)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Splice `declaration` in below the first line containing `anchor`.
    /// A missing anchor leaves the text untouched.
    fn insert_after(&mut self, anchor: &str, declaration: &str) -> bool {
        let mut offset = 0;
        let mut anchor_line = None;
        for line in self.text.split_inclusive('\n') {
            if line.contains(anchor) {
                anchor_line = Some(line);
                break;
            }
            offset += line.len();
        }
        let Some(line) = anchor_line else {
            return false;
        };

        let indent: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
        let insertion = if line.ends_with("\r\n") {
            format!("{}{}\r\n", indent, declaration)
        } else if line.ends_with('\n') {
            format!("{}{}\n", indent, declaration)
        } else {
            // unterminated last line: the new last line stays unterminated
            format!("\n{}{}", indent, declaration)
        };
        let end = offset + line.len();

        self.text.insert_str(end, &insertion);
        true
    }
}

/// Result of a patch run. `NotFound` is informational, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatchOutcome {
    Patched {
        path: PathBuf,
        name_added: bool,
        soft_deletes_added: bool,
    },
    NotFound,
}

/// Find the create-table migration for `name` and patch it in place.
///
/// The first file (in store enumeration order) whose name contains
/// `create_<table>_table` is patched. When several match, which one that is
/// depends on the store's ordering; `LocalFileStore` sorts by file name.
pub fn patch_migration(
    name: &ResourceName,
    layout: &ProjectLayout,
    store: &dyn FileStore,
) -> Result<PatchOutcome, ScaffoldError> {
    let dir = &layout.migrations_dir;
    let files = match store.list(dir) {
        Ok(files) => files,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "migrations directory does not exist");
            return Ok(PatchOutcome::NotFound);
        }
        Err(e) => return Err(ScaffoldError::patch(dir, e)),
    };

    let token = name.migration_token();
    let matched = files.into_iter().find(|path| {
        path.file_name()
            .and_then(|f| f.to_str())
            .is_some_and(|f| f.contains(&token))
    });

    let Some(path) = matched else {
        tracing::debug!(%token, "no migration matches");
        return Ok(PatchOutcome::NotFound);
    };

    let text = store.read(&path).map_err(|e| ScaffoldError::patch(&path, e))?;
    let mut document = MigrationDocument::new(text);
    let name_added = document.ensure_name_column();
    let soft_deletes_added = document.ensure_soft_deletes();

    store
        .write(&path, document.as_str())
        .map_err(|e| ScaffoldError::patch(&path, e))?;

    tracing::info!(
        path = %path.display(),
        name_added,
        soft_deletes_added,
        "patched migration"
    );

    Ok(PatchOutcome::Patched {
        path,
        name_added,
        soft_deletes_added,
    })
}
