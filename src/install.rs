//! Putting the mocks on a command search path.
//!
//! Code under test shells out to `smartctl`, `zfs`, ... by name, so the mocks
//! only take effect when a directory holding them comes first on `PATH`.

use std::env::{self, JoinPathsError};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::commands::MockCommand;

/// Returns a search path with `dir` in front of `current`.
///
/// Passing `None` as `current` yields a search path of just `dir`.
pub fn search_path_with(dir: &Path, current: Option<OsString>) -> Result<OsString, JoinPathsError> {
    let mut dirs = vec![dir.to_path_buf()];
    if let Some(current) = current {
        dirs.extend(env::split_paths(&current).filter(|p| p.as_path() != dir));
    }
    env::join_paths(dirs)
}

/// Directory the mock executables were built into: the one holding the
/// running binary.
pub fn sibling_bin_dir() -> io::Result<PathBuf> {
    let exe = env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))
}

/// Links every mock executable found in `from` into `bin_dir` under the
/// name of the command it mocks. Returns the links created.
///
/// Existing entries are left alone unless `force` is set. Nothing is linked
/// unless every mock is present and every destination can be written.
/// `bin_dir` must not be the directory holding the mocks.
#[cfg(unix)]
pub fn install_links(bin_dir: &Path, from: &Path, force: bool) -> io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(bin_dir)?;

    if std::fs::canonicalize(bin_dir)? == std::fs::canonicalize(from)? {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} already holds the mock executables; link them somewhere else",
                bin_dir.display()
            ),
        ));
    }

    let mut planned = Vec::new();
    for command in MockCommand::ALL {
        let source = from.join(command.name());
        if !source.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock executable not found: {}", source.display()),
            ));
        }

        let link = bin_dir.join(command.name());
        let exists = link.symlink_metadata().is_ok();
        if exists && !force {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists (use --force)", link.display()),
            ));
        }
        planned.push((source, link, exists));
    }

    let mut created = Vec::new();
    for (source, link, exists) in planned {
        if exists {
            std::fs::remove_file(&link)?;
        }
        std::os::unix::fs::symlink(&source, &link)?;
        debug!("Linked {} -> {}", link.display(), source.display());
        created.push(link);
    }

    info!("Installed {} mocks into {}", created.len(), bin_dir.display());
    Ok(created)
}
