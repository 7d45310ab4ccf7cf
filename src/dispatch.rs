//! The mock command dispatcher.
//!
//! One invocation is one stateless request/response cycle: match the
//! argument vector against the command's rule table, read the fixture the
//! first matching rule names, and write its bytes to stdout. Anything else
//! exits 1 with nothing on stdout.

use std::ffi::OsString;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{debug, warn};

use crate::commands::MockCommand;
use crate::config::{ConfigError, MockConfig};
use crate::fixture::{FileSystem, FixtureStore, RealFs};
use crate::platform::Platform;

/// Exit status for every failure. Consumers only distinguish zero/non-zero.
pub const EXIT_FAILURE: u8 = 1;

/// Why a mock could not answer an invocation.
#[derive(Debug)]
pub enum DispatchError {
    /// No rule in the command's table matches the arguments.
    NoMatchingRule {
        command: MockCommand,
        args: Vec<String>,
    },
    /// A rule matched but its fixture could not be read.
    FixtureUnreadable { path: PathBuf, source: io::Error },
    /// The mock is not configured.
    Config(ConfigError),
    /// Writing the fixture to stdout failed.
    Output(io::Error),
}

impl DispatchError {
    /// Process exit status for this error.
    ///
    /// All failures share one status: "no canned answer" is a single
    /// condition from the caller's point of view.
    pub fn exit_code(&self) -> u8 {
        EXIT_FAILURE
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NoMatchingRule { command, args } => {
                write!(f, "{}: no fixture rule for arguments {:?}", command, args)
            }
            DispatchError::FixtureUnreadable { path, source } => {
                write!(f, "cannot read fixture {}: {}", path.display(), source)
            }
            DispatchError::Config(e) => write!(f, "configuration error: {}", e),
            DispatchError::Output(e) => write!(f, "cannot write output: {}", e),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::FixtureUnreadable { source, .. } => Some(source),
            DispatchError::Config(e) => Some(e),
            DispatchError::Output(e) => Some(e),
            DispatchError::NoMatchingRule { .. } => None,
        }
    }
}

impl From<ConfigError> for DispatchError {
    fn from(e: ConfigError) -> Self {
        DispatchError::Config(e)
    }
}

/// Resolves invocations of one mocked command against a fixture store.
pub struct Dispatcher<F: FileSystem> {
    command: MockCommand,
    platform: Platform,
    store: FixtureStore<F>,
}

impl Dispatcher<RealFs> {
    /// Dispatcher reading the on-disk store named by `config`.
    pub fn from_config(command: MockCommand, config: &MockConfig) -> Self {
        let store = FixtureStore::new(RealFs::new(), config.fixture_root.clone());
        Self::new(command, config.platform, store)
    }
}

impl<F: FileSystem> Dispatcher<F> {
    pub fn new(command: MockCommand, platform: Platform, store: FixtureStore<F>) -> Self {
        Self {
            command,
            platform,
            store,
        }
    }

    pub fn command(&self) -> MockCommand {
        self.command
    }

    /// Path of the fixture `args` resolve to. The file is not opened.
    pub fn resolve<S: AsRef<str>>(&self, args: &[S]) -> Result<PathBuf, DispatchError> {
        let Some((rule, key)) = self.command.rules().find(args) else {
            return Err(DispatchError::NoMatchingRule {
                command: self.command,
                args: args.iter().map(|a| a.as_ref().to_string()).collect(),
            });
        };
        let path = self.store.path_for(self.platform, self.command, &key);
        debug!(
            "{}: matched '{}' -> {}",
            self.command,
            rule.describe(),
            path.display()
        );
        Ok(path)
    }

    /// Fixture bytes for `args`, exactly as stored.
    pub fn respond<S: AsRef<str>>(&self, args: &[S]) -> Result<Vec<u8>, DispatchError> {
        let path = self.resolve(args)?;
        self.store
            .load(&path)
            .map_err(|source| DispatchError::FixtureUnreadable { path, source })
    }

    /// Resolves `args` and writes the fixture to `out`.
    ///
    /// Nothing is written unless the whole fixture was read.
    pub fn replay<S, W>(&self, args: &[S], out: &mut W) -> Result<(), DispatchError>
    where
        S: AsRef<str>,
        W: Write,
    {
        let bytes = self.respond(args)?;
        out.write_all(&bytes).map_err(DispatchError::Output)?;
        out.flush().map_err(DispatchError::Output)
    }
}

/// Entry point shared by the mock executables.
///
/// Reads configuration from the environment, replays the fixture for the
/// process arguments on stdout, and maps the outcome to an exit status.
pub fn run(command: MockCommand) -> ExitCode {
    crate::logging::init_mock_logging();

    let args = std::env::args_os().skip(1);
    match utf8_args(command, args).and_then(|args| run_with(command, &args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            warn!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Converts raw process arguments to strings.
///
/// Rules only match UTF-8 arguments, so an argument that is not valid UTF-8
/// makes the whole invocation unmatched.
fn utf8_args<I>(command: MockCommand, raw: I) -> Result<Vec<String>, DispatchError>
where
    I: IntoIterator<Item = OsString>,
{
    let raw: Vec<OsString> = raw.into_iter().collect();
    let mut args = Vec::with_capacity(raw.len());
    for arg in &raw {
        match arg.to_str() {
            Some(arg) => args.push(arg.to_string()),
            None => {
                return Err(DispatchError::NoMatchingRule {
                    command,
                    args: raw.iter().map(|a| a.to_string_lossy().into_owned()).collect(),
                });
            }
        }
    }
    Ok(args)
}

fn run_with(command: MockCommand, args: &[String]) -> Result<(), DispatchError> {
    let config = MockConfig::from_env()?;
    let dispatcher = Dispatcher::from_config(command, &config);
    let stdout = io::stdout();
    dispatcher.replay(args, &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{MockFs, SCENARIO_ROOT};
    use std::path::Path;

    fn dispatcher(command: MockCommand, fs: MockFs) -> Dispatcher<MockFs> {
        Dispatcher::new(
            command,
            Platform::Freebsd,
            FixtureStore::new(fs, SCENARIO_ROOT),
        )
    }

    fn smartctl() -> Dispatcher<MockFs> {
        dispatcher(MockCommand::Smartctl, MockFs::freebsd_storage_host())
    }

    #[test]
    fn test_scan_replays_fixture() {
        let bytes = smartctl().respond(&["--scan"]).unwrap();
        assert!(bytes.starts_with(b"/dev/ada0 -d atacam"));
        assert!(bytes.ends_with(b"ATA device\n"));
    }

    #[test]
    fn test_info_by_full_path_and_basename() {
        let d = smartctl();
        let full = d.respond(&["--info", "/dev/ada0"]).unwrap();
        let bare = d.respond(&["--info", "ada0"]).unwrap();
        assert_eq!(full, bare);
        assert!(String::from_utf8(full).unwrap().contains("WDC WD40EFRX"));
    }

    #[test]
    fn test_resolve_path() {
        let path = smartctl()
            .resolve(&["--format=hex", "--attributes", "/dev/ada1"])
            .unwrap();
        assert_eq!(
            path,
            Path::new("/data/mock-output/freebsd/smartctl/attributes/ada1")
        );
    }

    #[test]
    fn test_driver_qualified_health() {
        let d = smartctl();
        assert_eq!(
            d.respond(&["-d", "atacam", "--health", "/dev/ada1"]).unwrap(),
            d.respond(&["--health", "/dev/ada1"]).unwrap()
        );
    }

    #[test]
    fn test_unknown_flag_is_no_match() {
        let err = smartctl().respond(&["--unknown-flag"]).unwrap_err();
        match &err {
            DispatchError::NoMatchingRule { command, args } => {
                assert_eq!(*command, MockCommand::Smartctl);
                assert_eq!(args, &vec!["--unknown-flag".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_missing_device_fixture_is_unreadable() {
        let err = smartctl().respond(&["--health", "/dev/ses0"]).unwrap_err();
        assert!(matches!(err, DispatchError::FixtureUnreadable { .. }));
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_directory_in_place_of_fixture() {
        let d = dispatcher(MockCommand::Zfs, MockFs::with_broken_fixtures());
        let err = d.respond(&["list", "-Hp"]).unwrap_err();
        assert!(matches!(err, DispatchError::FixtureUnreadable { .. }));
    }

    #[test]
    fn test_zfs_and_zpool() {
        let fs = MockFs::freebsd_storage_host();
        let zfs = dispatcher(MockCommand::Zfs, fs.clone());
        let volumes = zfs.respond(&["list", "-Hp"]).unwrap();
        assert_eq!(volumes.iter().filter(|&&b| b == b'\n').count(), 5);
        let snapshots = zfs.respond(&["list", "-Hpt", "snapshot"]).unwrap();
        assert_eq!(snapshots.iter().filter(|&&b| b == b'\n').count(), 2);

        let zpool = dispatcher(MockCommand::Zpool, fs);
        let pools = zpool.respond(&["list", "-Hp"]).unwrap();
        assert!(pools.starts_with(b"tank\t"));
        assert!(zpool.respond(&["iostat", "-v", "zroot"]).is_ok());
        assert!(zpool.respond(&["iostat", "-v", "tank"]).is_err());
    }

    #[test]
    fn test_generic_reads_root_relative() {
        let d = dispatcher(MockCommand::Generic, MockFs::freebsd_storage_host());
        let bytes = d.respond(&["freebsd", "df"]).unwrap();
        assert!(bytes.starts_with(b"Filesystem"));
        assert!(d.respond(&["linux", "df"]).is_err());
        // A command directory is not a fixture.
        assert!(d.respond(&["freebsd", "zfs"]).is_err());
    }

    #[test]
    fn test_bytes_are_exact() {
        let d = Dispatcher::new(
            MockCommand::Zfs,
            Platform::Linux,
            FixtureStore::new(MockFs::with_awkward_whitespace(), SCENARIO_ROOT),
        );
        assert_eq!(
            d.respond(&["list", "-Hp"]).unwrap(),
            b"tank\t1\t2\t3\t/tank  \r\n\n\n"
        );
        assert_eq!(
            d.respond(&["list", "-Hpt", "snapshot"]).unwrap(),
            b"tank@now\t0\t-\t3\t-"
        );
    }

    #[test]
    fn test_replay_writes_nothing_on_failure() {
        let d = smartctl();
        let mut out = Vec::new();
        assert!(d.replay(&["--health", "/dev/ses0"], &mut out).is_err());
        assert!(d.replay(&["--bogus"], &mut out).is_err());
        assert!(out.is_empty());

        d.replay(&["--health", "ada0"], &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("PASSED"));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let d = smartctl();
        let first = d.respond(&["--info", "/dev/ada1"]).unwrap();
        for _ in 0..10 {
            assert_eq!(d.respond(&["--info", "/dev/ada1"]).unwrap(), first);
        }
    }

    #[test]
    fn test_utf8_args() {
        let raw = ["--info", "/dev/ada0"].map(OsString::from);
        assert_eq!(
            utf8_args(MockCommand::Smartctl, raw).unwrap(),
            vec!["--info", "/dev/ada0"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_argument_is_no_match() {
        use std::os::unix::ffi::OsStringExt;

        let raw = vec![
            OsString::from("--info"),
            OsString::from_vec(b"/dev/ad\xff0".to_vec()),
        ];
        let err = utf8_args(MockCommand::Smartctl, raw).unwrap_err();
        match &err {
            DispatchError::NoMatchingRule { command, args } => {
                assert_eq!(*command, MockCommand::Smartctl);
                assert_eq!(args[0], "--info");
                assert_eq!(args[1], "/dev/ad\u{FFFD}0");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_error_display() {
        let err = DispatchError::Config(ConfigError::MissingFixtureRoot);
        assert_eq!(
            err.to_string(),
            "configuration error: CMDMOCK_FIXTURE_ROOT is not set"
        );
    }
}
