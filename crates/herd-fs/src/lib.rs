//! Async filesystem abstraction for Herd.
//!
//! This crate provides a [`FileSystem`] trait with a native
//! implementation (std::fs offloaded via `tokio::spawn_blocking`) and an
//! in-memory implementation for tests.
//!
//! # Example
//!
//! ```no_run
//! use herd_fs::{FileSystem, NativeFileSystem};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> std::io::Result<()> {
//! let fs = NativeFileSystem::new();
//! let contents = fs.read_to_string(Path::new("README.md")).await?;
//! println!("{}", contents);
//! # Ok(())
//! # }
//! ```

mod file_system;
pub use file_system::{FileMetadata, FileSystem};

pub mod memory;
pub use memory::MemoryFileSystem;

pub mod native;
pub use native::NativeFileSystem;
