//! In-memory mock filesystem for testing the dispatcher without a fixture tree
//! on disk.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use super::traits::FileSystem;

/// In-memory filesystem for testing.
///
/// Stores files and directories in memory so tests can describe fixture
/// stores, including missing or misplaced fixtures, without touching disk.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, Vec<u8>>,
    /// Set of directories (for read_dir support).
    directories: HashSet<PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }

    /// Loads a mock filesystem from a fixture tree on disk, mounted at `mount`.
    pub fn from_snapshot(dir: &Path, mount: &Path) -> io::Result<Self> {
        let mut fs = Self::new();
        load_directory_recursive(&mut fs, dir, mount)?;
        Ok(fs)
    }
}

fn load_directory_recursive(
    fs: &mut MockFs,
    real_path: &Path,
    virtual_path: &Path,
) -> io::Result<()> {
    fs.add_dir(virtual_path);

    for entry in std::fs::read_dir(real_path)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let real_child = entry.path();
        let virtual_child = virtual_path.join(entry.file_name());

        if file_type.is_dir() {
            load_directory_recursive(fs, &real_child, &virtual_child)?;
        } else if file_type.is_file() {
            fs.add_file(&virtual_child, std::fs::read(&real_child)?);
        }
    }
    Ok(())
}

impl FileSystem for MockFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("is a directory: {:?}", path),
            ));
        }
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut entries = HashSet::new();

        // Direct children only
        for file_path in self.files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }

        for dir_path in &self.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_add_file() {
        let mut fs = MockFs::new();
        fs.add_file("/fixtures/freebsd/zfs/volumes", "zroot\t1024\n");

        assert!(fs.is_file(Path::new("/fixtures/freebsd/zfs/volumes")));
        assert!(!fs.is_file(Path::new("/fixtures/freebsd/zfs")));

        let content = fs.read(Path::new("/fixtures/freebsd/zfs/volumes")).unwrap();
        assert_eq!(content, b"zroot\t1024\n");
    }

    #[test]
    fn test_mock_fs_read_dir() {
        let mut fs = MockFs::new();
        fs.add_file("/fixtures/freebsd/smartctl/info/ada0", "a");
        fs.add_file("/fixtures/freebsd/smartctl/info/ada1", "b");
        fs.add_file("/fixtures/freebsd/smartctl/scan", "c");

        let entries = fs.read_dir(Path::new("/fixtures/freebsd/smartctl")).unwrap();
        assert_eq!(entries.len(), 2); // info/ and scan

        let info = fs.read_dir(Path::new("/fixtures/freebsd/smartctl/info")).unwrap();
        assert_eq!(info.len(), 2);
    }

    #[test]
    fn test_mock_fs_read_directory_fails() {
        let mut fs = MockFs::new();
        fs.add_dir("/fixtures/linux");
        let err = fs.read(Path::new("/fixtures/linux")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::IsADirectory);
    }

    #[test]
    fn test_mock_fs_not_found() {
        let fs = MockFs::new();
        let result = fs.read(Path::new("/nonexistent"));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_fs_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let info = dir.path().join("freebsd/smartctl/info");
        std::fs::create_dir_all(&info).unwrap();
        std::fs::write(info.join("ada0"), b"Device Model: X\n").unwrap();

        let fs = MockFs::from_snapshot(dir.path(), Path::new("/fixtures")).unwrap();
        assert_eq!(
            fs.read(Path::new("/fixtures/freebsd/smartctl/info/ada0")).unwrap(),
            b"Device Model: X\n"
        );
    }
}
