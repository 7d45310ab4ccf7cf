//! Abstractions for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait lets the fixture store read from a real fixture
//! tree on disk or from an in-memory tree built by a unit test.

use std::io;
use std::path::{Path, PathBuf};

/// Abstraction for the read-only filesystem operations a fixture store needs.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as raw bytes.
    ///
    /// Fixtures are replayed byte for byte, so no text decoding happens here.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Checks if a path exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Lists entries in a directory.
    ///
    /// # Returns
    /// A vector of paths to entries in the directory, or an I/O error.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)?;
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }
}
