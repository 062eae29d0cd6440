//! In-memory filesystem implementation for tests and embedding.

use crate::{FileMetadata, FileSystem};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Default)]
struct State {
    files: HashMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    reads: usize,
    writes: usize,
}

/// In-memory filesystem.
///
/// Tracks read/write operation counts so tests can assert on I/O
/// behavior (e.g., that an empty enrichment batch performs no reads).
///
/// # Thread Safety
///
/// Uses `Arc<RwLock<..>>` for interior mutability; clones share state.
#[derive(Clone, Default)]
pub struct MemoryFileSystem {
    state: Arc<RwLock<State>>,
}

impl MemoryFileSystem {
    /// Create a new empty in-memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load a file, creating parent directories.
    pub fn insert_file(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.state.write();
        add_ancestors(&mut state.dirs, &path);
        state.files.insert(path, contents.into());
    }

    /// Number of read operations performed (exists/read/metadata/read_dir).
    pub fn read_count(&self) -> usize {
        self.state.read().reads
    }

    /// Number of write operations performed.
    pub fn write_count(&self) -> usize {
        self.state.read().writes
    }

    /// Total operations performed.
    pub fn operation_count(&self) -> usize {
        let state = self.state.read();
        state.reads + state.writes
    }

    /// All file paths currently stored, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let state = self.state.read();
        let mut paths: Vec<PathBuf> = state.files.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Contents of a stored file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state.read().files.get(path.as_ref()).cloned()
    }
}

fn add_ancestors(dirs: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = path.parent();
    while let Some(dir) = current {
        if dir.as_os_str().is_empty() {
            break;
        }
        dirs.insert(dir.to_path_buf());
        current = dir.parent();
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

#[async_trait::async_trait]
impl FileSystem for MemoryFileSystem {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        let mut state = self.state.write();
        state.reads += 1;
        Ok(state.files.contains_key(path) || state.dirs.contains(path))
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let mut state = self.state.write();
        state.reads += 1;
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    async fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let mut state = self.state.write();
        state.reads += 1;
        if let Some(contents) = state.files.get(path) {
            Ok(FileMetadata {
                exists: true,
                is_file: true,
                is_dir: false,
                size: contents.len() as u64,
            })
        } else if state.dirs.contains(path) {
            Ok(FileMetadata {
                exists: true,
                is_file: false,
                is_dir: true,
                size: 0,
            })
        } else {
            Ok(FileMetadata {
                exists: false,
                is_file: false,
                is_dir: false,
                size: 0,
            })
        }
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut state = self.state.write();
        state.writes += 1;
        add_ancestors(&mut state.dirs, path);
        state.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    async fn write_atomic(&self, path: &Path, contents: &str) -> io::Result<()> {
        // A HashMap insert is already atomic from a reader's perspective;
        // no temporary file is materialized.
        self.write(path, contents).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.state.write();
        state.writes += 1;
        let contents = state.files.remove(from).ok_or_else(|| not_found(from))?;
        add_ancestors(&mut state.dirs, to);
        state.files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.write();
        state.writes += 1;
        state.dirs.insert(path.to_path_buf());
        add_ancestors(&mut state.dirs, path);
        Ok(())
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.write();
        state.writes += 1;
        state.dirs.retain(|dir| !dir.starts_with(path));
        state.files.retain(|file, _| !file.starts_with(path));
        Ok(())
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut state = self.state.write();
        state.reads += 1;
        if !state.dirs.contains(path) {
            return Err(not_found(path));
        }
        let mut entries = BTreeSet::new();
        for candidate in state.files.keys().chain(state.dirs.iter()) {
            if candidate.parent() == Some(path) {
                entries.insert(candidate.clone());
            }
        }
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_write_round_trip() {
        let fs = MemoryFileSystem::new();
        fs.write(Path::new("/project/src/a.ts"), "const a = 1")
            .await
            .unwrap();

        let contents = fs.read_to_string(Path::new("/project/src/a.ts")).await.unwrap();
        assert_eq!(contents, "const a = 1");
        assert_eq!(fs.write_count(), 1);
        assert_eq!(fs.read_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let fs = MemoryFileSystem::new();
        let err = fs.read_to_string(Path::new("/nope")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_remove_dir_all_is_idempotent_and_recursive() {
        let fs = MemoryFileSystem::new();
        fs.insert_file("/out/eslint/errors/a.json", "{}");
        fs.insert_file("/out/eslint/errors/b.json", "{}");
        fs.insert_file("/out/typescript/errors/c.json", "{}");

        fs.remove_dir_all(Path::new("/out/eslint")).await.unwrap();
        assert!(!fs.exists(Path::new("/out/eslint/errors/a.json")).await.unwrap());
        assert!(fs.exists(Path::new("/out/typescript/errors/c.json")).await.unwrap());

        // Absent directory: still Ok.
        fs.remove_dir_all(Path::new("/out/eslint")).await.unwrap();
    }

    #[tokio::test]
    async fn test_read_dir_lists_direct_children() {
        let fs = MemoryFileSystem::new();
        fs.insert_file("/out/a.json", "{}");
        fs.insert_file("/out/nested/b.json", "{}");

        let entries = fs.read_dir(Path::new("/out")).await.unwrap();
        assert_eq!(
            entries,
            vec![PathBuf::from("/out/a.json"), PathBuf::from("/out/nested")]
        );
    }
}
