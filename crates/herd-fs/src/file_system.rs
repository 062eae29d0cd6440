//! FileSystem trait for the diagnostic report pipeline.

use std::io;
use std::path::{Path, PathBuf};

/// File metadata compatible across implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Whether the path exists.
    pub exists: bool,
    /// Whether the path is a file (false if directory or doesn't exist).
    pub is_file: bool,
    /// Whether the path is a directory.
    pub is_dir: bool,
    /// File size in bytes (0 for directories or non-existent files).
    pub size: u64,
}

/// Async filesystem abstraction.
///
/// All methods are async to support both:
/// - **Native**: blocking I/O offloaded via `tokio::spawn_blocking`
/// - **Memory**: in-memory operations that complete immediately (tests)
///
/// Uses `std::io::Result<T>`; callers wrap failures with path context
/// into `herd_core::Error::FileSystem`.
#[async_trait::async_trait]
pub trait FileSystem: Send + Sync {
    /// Check if a path exists.
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Read file contents as a string.
    ///
    /// # Errors
    ///
    /// Returns `io::ErrorKind::NotFound` if the file doesn't exist.
    /// Returns `io::ErrorKind::InvalidData` if the file is not valid UTF-8.
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Get file/directory metadata.
    ///
    /// Returns metadata even if the path doesn't exist (exists=false),
    /// avoiding a separate exists() + metadata() pair.
    async fn metadata(&self, path: &Path) -> io::Result<FileMetadata>;

    /// Write string contents to a file, overwriting any existing file.
    ///
    /// Parent directories are NOT created automatically.
    async fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Atomically write string contents to a file.
    ///
    /// Content is written to a sibling temporary file and renamed into
    /// place, so a concurrent reader observes either the old state or the
    /// complete new file, never a partial write.
    async fn write_atomic(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Atomically rename a file.
    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create a directory and all parent directories.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and everything under it.
    ///
    /// Idempotent: removing an absent directory succeeds.
    async fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// List the entries of a directory.
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}
