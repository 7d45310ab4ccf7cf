//! On-disk fixture store layout.
//!
//! ```text
//! <root>/<platform>/<command>/<key...>
//! ```
//!
//! `<root>` is the `data/mock-output` directory of a test tree.

use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::traits::FileSystem;
use crate::commands::MockCommand;
use crate::platform::Platform;
use crate::rules::FixtureKey;

/// Read-only view of a fixture tree.
#[derive(Debug, Clone)]
pub struct FixtureStore<F: FileSystem> {
    fs: F,
    root: PathBuf,
}

impl<F: FileSystem> FixtureStore<F> {
    pub fn new(fs: F, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding `command`'s fixtures for `platform`.
    ///
    /// The generic dispatcher has no command directory; its keys are
    /// root-relative, so the platform directory is returned.
    pub fn command_dir(&self, platform: Platform, command: MockCommand) -> PathBuf {
        let dir = self.root.join(platform.as_str());
        match command.fixture_dir() {
            Some(name) => dir.join(name),
            None => dir,
        }
    }

    /// Absolute path of the fixture a resolved key points at.
    pub fn path_for(&self, platform: Platform, command: MockCommand, key: &FixtureKey) -> PathBuf {
        match key {
            FixtureKey::Command(rel) => self.command_dir(platform, command).join(rel),
            FixtureKey::Root(rel) => self.root.join(rel),
        }
    }

    /// Reads a fixture's bytes. Every call goes to the filesystem.
    pub fn load(&self, path: &Path) -> io::Result<Vec<u8>> {
        let bytes = self.fs.read(path)?;
        trace!("Loaded {} bytes from {}", bytes.len(), path.display());
        Ok(bytes)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.fs.is_file(path)
    }

    /// Names of the fixture files in a directory, sorted.
    ///
    /// Used to list which devices a device-keyed rule has fixtures for.
    pub fn list(&self, dir: &Path) -> io::Result<Vec<String>> {
        self.names(dir, true)
    }

    /// Sorted names of the subdirectories of `dir`.
    pub fn list_dirs(&self, dir: &Path) -> io::Result<Vec<String>> {
        self.names(dir, false)
    }

    fn names(&self, dir: &Path, files: bool) -> io::Result<Vec<String>> {
        let mut names: Vec<String> = self
            .fs
            .read_dir(dir)?
            .into_iter()
            .filter(|path| self.fs.is_file(path) == files)
            .filter_map(|path| Some(path.file_name()?.to_str()?.to_string()))
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::MockFs;

    fn store() -> FixtureStore<MockFs> {
        let mut fs = MockFs::new();
        fs.add_file("/data/mock-output/freebsd/smartctl/scan", "/dev/ada0\n");
        fs.add_file("/data/mock-output/freebsd/smartctl/info/ada1", "b");
        fs.add_file("/data/mock-output/freebsd/smartctl/info/ada0", "a");
        fs.add_dir("/data/mock-output/freebsd/smartctl/info/nested");
        fs.add_file("/data/mock-output/linux/df", "Filesystem\n");
        FixtureStore::new(fs, "/data/mock-output")
    }

    #[test]
    fn test_path_for_command_key() {
        let store = store();
        let path = store.path_for(
            Platform::Freebsd,
            MockCommand::Smartctl,
            &FixtureKey::command("info/ada0"),
        );
        assert_eq!(path, Path::new("/data/mock-output/freebsd/smartctl/info/ada0"));
    }

    #[test]
    fn test_path_for_root_key_ignores_platform() {
        let store = store();
        let path = store.path_for(
            Platform::Freebsd,
            MockCommand::Generic,
            &FixtureKey::root("linux/df"),
        );
        assert_eq!(path, Path::new("/data/mock-output/linux/df"));
    }

    #[test]
    fn test_load() {
        let store = store();
        let bytes = store
            .load(Path::new("/data/mock-output/freebsd/smartctl/scan"))
            .unwrap();
        assert_eq!(bytes, b"/dev/ada0\n");
        assert!(store.load(Path::new("/data/mock-output/freebsd/zfs/volumes")).is_err());
    }

    #[test]
    fn test_list_skips_directories() {
        let store = store();
        let names = store
            .list(Path::new("/data/mock-output/freebsd/smartctl/info"))
            .unwrap();
        assert_eq!(names, vec!["ada0", "ada1"]);
    }

    #[test]
    fn test_list_dirs_skips_files() {
        let store = store();
        let names = store
            .list_dirs(Path::new("/data/mock-output/freebsd/smartctl"))
            .unwrap();
        assert_eq!(names, vec!["info"]);
    }

    #[test]
    fn test_command_dir() {
        let store = store();
        assert_eq!(
            store.command_dir(Platform::Linux, MockCommand::Zpool),
            Path::new("/data/mock-output/linux/zpool")
        );
        assert_eq!(
            store.command_dir(Platform::Linux, MockCommand::Generic),
            Path::new("/data/mock-output/linux")
        );
    }
}
