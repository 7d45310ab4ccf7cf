//! Catalog of mocked commands and their rule tables.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::rules::Token::{Any, Key, Literal};
use crate::rules::{Rule, RuleSet};

static SMARTCTL_RULES: &[Rule] = &[
    Rule::exact(&[Literal("--scan")], "scan"),
    Rule::device(&[Literal("--info")], "info"),
    Rule::device(&[Literal("--health")], "health"),
    Rule::device(&[Literal("--format=hex"), Literal("--attributes")], "attributes"),
    // Driver-qualified variants read the same fixtures.
    Rule::device(&[Literal("-d"), Any, Literal("--info")], "info"),
    Rule::device(&[Literal("-d"), Any, Literal("--health")], "health"),
    Rule::device(
        &[Literal("-d"), Any, Literal("--format=hex"), Literal("--attributes")],
        "attributes",
    ),
];

static ZFS_RULES: &[Rule] = &[
    Rule::exact(&[Literal("list"), Literal("-Hp")], "volumes"),
    Rule::exact(&[Literal("list"), Literal("-Hpt"), Literal("snapshot")], "snapshots"),
];

static ZPOOL_RULES: &[Rule] = &[
    Rule::exact(&[Literal("list"), Literal("-Hp")], "zpools"),
    Rule::device(&[Literal("iostat"), Literal("-v")], "iostat"),
    // Properties and `feature@<name>` lookups share one form.
    Rule::device(&[Literal("get"), Literal("-H"), Key], "get"),
];

static GENERIC_RULES: &[Rule] = &[Rule::positional(2)];

/// A command the framework can stand in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MockCommand {
    /// smartmontools `smartctl`.
    Smartctl,
    /// ZFS dataset manager.
    Zfs,
    /// ZFS pool manager.
    Zpool,
    /// Generic `<platform> <command>` playback, installed as `df`.
    Generic,
}

impl MockCommand {
    pub const ALL: [MockCommand; 4] = [
        MockCommand::Smartctl,
        MockCommand::Zfs,
        MockCommand::Zpool,
        MockCommand::Generic,
    ];

    /// Executable name the mock is installed under.
    pub fn name(&self) -> &'static str {
        match self {
            MockCommand::Smartctl => "smartctl",
            MockCommand::Zfs => "zfs",
            MockCommand::Zpool => "zpool",
            MockCommand::Generic => "df",
        }
    }

    /// Directory holding this command's fixtures under a platform, if the
    /// command's fixtures are scoped by command at all.
    pub fn fixture_dir(&self) -> Option<&'static str> {
        match self {
            MockCommand::Generic => None,
            other => Some(other.name()),
        }
    }

    pub fn rules(&self) -> RuleSet {
        match self {
            MockCommand::Smartctl => RuleSet::new(SMARTCTL_RULES),
            MockCommand::Zfs => RuleSet::new(ZFS_RULES),
            MockCommand::Zpool => RuleSet::new(ZPOOL_RULES),
            MockCommand::Generic => RuleSet::new(GENERIC_RULES),
        }
    }

    /// Picks the mock from the name it was invoked as (`argv[0]`).
    pub fn from_program_name(program: &str) -> Option<MockCommand> {
        let name = Path::new(program).file_stem()?.to_str()?;
        name.parse().ok()
    }
}

impl fmt::Display for MockCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Error returned for a command name with no mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no mock for command '{}'", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for MockCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MockCommand::ALL
            .into_iter()
            .find(|cmd| cmd.name() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}
