//! Native filesystem implementation using std::fs + tokio.

use crate::{FileMetadata, FileSystem};
use std::io;
use std::path::{Path, PathBuf};
use tokio::task;

/// Native filesystem implementation using std::fs + tokio.
///
/// Wraps blocking std::fs calls with `tokio::spawn_blocking` to avoid
/// blocking the async runtime.
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    /// Create a new native filesystem.
    pub fn new() -> Self {
        Self
    }
}

fn join_panic(err: task::JoinError) -> io::Error {
    io::Error::other(err)
}

#[async_trait::async_trait]
impl FileSystem for NativeFileSystem {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        let path = path.to_path_buf();
        task::spawn_blocking(move || Ok(path.exists()))
            .await
            .map_err(join_panic)?
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let path = path.to_path_buf();
        task::spawn_blocking(move || std::fs::read_to_string(&path))
            .await
            .map_err(join_panic)?
    }

    async fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let path = path.to_path_buf();
        task::spawn_blocking(move || match std::fs::metadata(&path) {
            Ok(meta) => Ok(FileMetadata {
                exists: true,
                is_file: meta.is_file(),
                is_dir: meta.is_dir(),
                size: meta.len(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileMetadata {
                exists: false,
                is_file: false,
                is_dir: false,
                size: 0,
            }),
            Err(e) => Err(e),
        })
        .await
        .map_err(join_panic)?
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let path = path.to_path_buf();
        let contents = contents.to_string();
        task::spawn_blocking(move || std::fs::write(&path, contents))
            .await
            .map_err(join_panic)?
    }

    async fn write_atomic(&self, path: &Path, contents: &str) -> io::Result<()> {
        let path = path.to_path_buf();
        let contents = contents.to_string();
        task::spawn_blocking(move || {
            // Temp file in the same directory so the rename stays on one
            // filesystem and is atomic.
            let mut file_name = path
                .file_name()
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
                })?
                .to_os_string();
            file_name.push(".tmp");
            let temp_path = path.with_file_name(file_name);

            std::fs::write(&temp_path, contents)?;
            std::fs::rename(&temp_path, &path)
        })
        .await
        .map_err(join_panic)?
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let from = from.to_path_buf();
        let to = to.to_path_buf();
        task::spawn_blocking(move || std::fs::rename(&from, &to))
            .await
            .map_err(join_panic)?
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let path = path.to_path_buf();
        task::spawn_blocking(move || std::fs::create_dir_all(&path))
            .await
            .map_err(join_panic)?
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let path = path.to_path_buf();
        task::spawn_blocking(move || match std::fs::remove_dir_all(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .await
        .map_err(join_panic)?
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let path = path.to_path_buf();
        task::spawn_blocking(move || {
            let mut entries = Vec::new();
            for entry in std::fs::read_dir(&path)? {
                entries.push(entry?.path());
            }
            entries.sort();
            Ok(entries)
        })
        .await
        .map_err(join_panic)?
    }
}
