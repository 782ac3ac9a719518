//! File access for the scaffolder, relative to a project root.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait FileStore {
    fn exists(&self, path: &Path) -> bool;

    /// Regular files directly inside `dir`, each returned as `dir/<file name>`.
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    fn read(&self, path: &Path) -> io::Result<String>;

    /// Create or replace `path`, creating missing parent directories.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// A `FileStore` over the real filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileStore for LocalFileStore {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(self.resolve(dir))? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(dir.join(entry.file_name()));
            }
        }
        // read_dir order is platform dependent; timestamped names sort oldest first
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(self.resolve(path))
    }

    /// Contents go to a temporary file in the target's directory which is then
    /// renamed over the target; the target is never left half-written.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let full = self.resolve(path);
        let parent = full.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        if let Some(permissions) = target_permissions(&full)? {
            temp.as_file().set_permissions(permissions)?;
        }
        temp.persist(&full).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Keep the mode of a file being replaced; new files get the usual 0644
/// instead of the private mode temporary files are created with.
fn target_permissions(path: &Path) -> io::Result<Option<fs::Permissions>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(new_file_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

/// In-memory `FileStore`, for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: RefCell<BTreeMap<PathBuf, String>>,
    writes: Cell<usize>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without counting it as a write.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), contents.into());
        self
    }

    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }
}

impl FileStore for MemoryFileStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let files = self.files.borrow();
        let listed: Vec<PathBuf> = files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .cloned()
            .collect();
        if listed.is_empty() && !files.keys().any(|path| path.starts_with(dir)) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", dir.display()),
            ));
        }
        Ok(listed)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", path.display()))
        })
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.files.borrow_mut().insert(path.to_path_buf(), contents.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_store_round_trip_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());
        let path = Path::new("app/Models/Invoice.php");

        assert!(!store.exists(path));
        store.write(path, "<?php\n").unwrap();
        assert!(store.exists(path));
        assert_eq!(store.read(path).unwrap(), "<?php\n");
    }

    #[test]
    fn test_local_store_overwrite_replaces_without_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());
        let path = Path::new("database/migrations/2024_05_01_120000_create_invoices_table.php");

        store.write(path, "first version\n").unwrap();
        store.write(path, "second\n").unwrap();

        assert_eq!(store.read(path).unwrap(), "second\n");
        let entries: Vec<_> = fs::read_dir(temp_dir.path().join("database/migrations"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![path.file_name().unwrap().to_owned()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_local_store_write_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());
        let path = Path::new("app/Models/Invoice.php");
        let full = temp_dir.path().join(path);

        store.write(path, "<?php\n").unwrap();
        assert_eq!(fs::metadata(&full).unwrap().permissions().mode() & 0o777, 0o644);

        fs::set_permissions(&full, fs::Permissions::from_mode(0o664)).unwrap();
        store.write(path, "<?php\n// changed\n").unwrap();
        assert_eq!(fs::metadata(&full).unwrap().permissions().mode() & 0o777, 0o664);
    }

    #[test]
    fn test_local_store_lists_files_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());
        let dir = Path::new("database/migrations");
        store.write(&dir.join("2024_02_01_000000_b.php"), "").unwrap();
        store.write(&dir.join("2024_01_01_000000_a.php"), "").unwrap();
        fs::create_dir_all(temp_dir.path().join("database/migrations/nested")).unwrap();

        let listed = store.list(dir).unwrap();
        assert_eq!(
            listed,
            vec![
                dir.join("2024_01_01_000000_a.php"),
                dir.join("2024_02_01_000000_b.php"),
            ]
        );
    }

    #[test]
    fn test_local_store_list_missing_dir_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());
        let err = store.list(Path::new("database/migrations")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_memory_store_counts_writes_only() {
        let store = MemoryFileStore::new().with_file("database/migrations/a.php", "x");
        assert_eq!(store.write_count(), 0);

        store.write(Path::new("database/migrations/b.php"), "y").unwrap();
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.list(Path::new("database/migrations")).unwrap().len(), 2);
        assert!(store.list(Path::new("database")).unwrap().is_empty());
        assert!(store.list(Path::new("app")).is_err());
    }
}
