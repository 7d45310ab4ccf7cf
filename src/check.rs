//! Fixture store coverage check.
//!
//! Walks every rule table and reports, for one platform, which fixed
//! fixtures are present and which devices have fixtures for device-keyed
//! rules.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::commands::MockCommand;
use crate::fixture::{FileSystem, FixtureStore};
use crate::platform::Platform;
use crate::rules::{FixtureKey, Target};

/// Coverage of one rule target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Coverage {
    /// A fixed fixture; `present` tells whether it is readable.
    Fixed { path: PathBuf, present: bool },
    /// A device-keyed directory and the device names found in it.
    Devices { dir: PathBuf, devices: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckEntry {
    pub command: MockCommand,
    pub coverage: Coverage,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub platform: Platform,
    pub entries: Vec<CheckEntry>,
}

impl CheckReport {
    /// Fixed fixtures a rule names but the store does not have.
    pub fn missing(&self) -> Vec<&PathBuf> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.coverage {
                Coverage::Fixed { path, present: false } => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match &entry.coverage {
                Coverage::Fixed { path, present } => {
                    let status = if *present { "ok" } else { "MISSING" };
                    writeln!(f, "{:<8} {:<8} {}", entry.command, status, path.display())?;
                }
                Coverage::Devices { dir, devices } => {
                    let found = if devices.is_empty() {
                        "(none)".to_string()
                    } else {
                        devices.join(", ")
                    };
                    writeln!(f, "{:<8} {:<8} {}/ [{}]", entry.command, "devices", dir.display(), found)?;
                }
            }
        }
        Ok(())
    }
}

/// Checks `store` against every mocked command's rules for `platform`.
pub fn check_store<F: FileSystem>(store: &FixtureStore<F>, platform: Platform) -> CheckReport {
    let mut report = CheckReport {
        platform,
        entries: Vec::new(),
    };

    for command in MockCommand::ALL {
        let mut seen_dirs: Vec<&str> = Vec::new();
        for rule in command.rules().rules() {
            let coverage = match rule.target {
                Target::Fixed(name) => {
                    let path = store.path_for(platform, command, &FixtureKey::command(name));
                    let present = store.contains(&path);
                    Coverage::Fixed { path, present }
                }
                Target::ByDevice(dir) => {
                    if seen_dirs.contains(&dir) {
                        continue;
                    }
                    seen_dirs.push(dir);
                    let dir = store.command_dir(platform, command).join(dir);
                    let devices = keyed_devices(store, &dir, rule.key_depth());
                    Coverage::Devices { dir, devices }
                }
                // Generic playback: every file directly under the platform.
                Target::Direct => {
                    let dir = store.command_dir(platform, command);
                    let devices = store.list(&dir).unwrap_or_default();
                    Coverage::Devices { dir, devices }
                }
            };
            debug!("{}: {:?}", command, coverage);
            report.entries.push(CheckEntry { command, coverage });
        }
    }

    report
}

/// Device fixtures under `dir`, reached through `depth` key directories.
/// Keyed entries are reported as `<key>/<device>`.
fn keyed_devices<F: FileSystem>(store: &FixtureStore<F>, dir: &Path, depth: usize) -> Vec<String> {
    if depth == 0 {
        return store.list(dir).unwrap_or_default();
    }
    store
        .list_dirs(dir)
        .unwrap_or_default()
        .into_iter()
        .flat_map(|key| {
            keyed_devices(store, &dir.join(&key), depth - 1)
                .into_iter()
                .map(move |device| format!("{}/{}", key, device))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{MockFs, SCENARIO_ROOT};

    fn devices_in(report: &CheckReport, suffix: &str) -> Vec<String> {
        report
            .entries
            .iter()
            .find_map(|e| match &e.coverage {
                Coverage::Devices { dir, devices } if dir.ends_with(suffix) => Some(devices.clone()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_storage_host_is_complete() {
        let store = FixtureStore::new(MockFs::freebsd_storage_host(), SCENARIO_ROOT);
        let report = check_store(&store, Platform::Freebsd);
        assert!(report.is_complete(), "missing: {:?}", report.missing());
        assert_eq!(devices_in(&report, "smartctl/info"), vec!["ada0", "ada1", "ses0"]);
    }

    #[test]
    fn test_device_dirs_listed_once() {
        let store = FixtureStore::new(MockFs::freebsd_storage_host(), SCENARIO_ROOT);
        let report = check_store(&store, Platform::Freebsd);
        let smartctl_dirs = report
            .entries
            .iter()
            .filter(|e| e.command == MockCommand::Smartctl)
            .filter(|e| matches!(e.coverage, Coverage::Devices { .. }))
            .count();
        assert_eq!(smartctl_dirs, 3);
    }

    #[test]
    fn test_broken_store_reports_missing() {
        let store = FixtureStore::new(MockFs::with_broken_fixtures(), SCENARIO_ROOT);
        let report = check_store(&store, Platform::Freebsd);
        assert!(!report.is_complete());

        let missing = report.missing();
        assert!(missing.contains(&&Path::new("/data/mock-output/freebsd/zfs/volumes").to_path_buf()));
        assert!(!missing.contains(&&Path::new("/data/mock-output/freebsd/smartctl/scan").to_path_buf()));
    }

    #[test]
    fn test_wrong_platform_is_empty() {
        let store = FixtureStore::new(MockFs::freebsd_storage_host(), SCENARIO_ROOT);
        let report = check_store(&store, Platform::Darwin);
        assert_eq!(report.missing().len(), 4);
        assert!(report.to_string().contains("MISSING"));
    }

    #[test]
    fn test_keyed_devices_include_key() {
        let store = FixtureStore::new(MockFs::freebsd_storage_host(), SCENARIO_ROOT);
        let report = check_store(&store, Platform::Freebsd);
        assert_eq!(
            devices_in(&report, "zpool/get"),
            vec!["feature@async_destroy/zroot", "health/zroot"]
        );
        assert_eq!(devices_in(&report, "zpool/iostat"), vec!["zroot"]);
    }

    #[test]
    fn test_checked_in_fixture_tree() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/mock-output");
        let fs = MockFs::from_snapshot(&root, Path::new(SCENARIO_ROOT)).unwrap();
        let store = FixtureStore::new(fs, SCENARIO_ROOT);

        let report = check_store(&store, Platform::Freebsd);
        assert!(report.is_complete(), "missing: {:?}", report.missing());
        assert_eq!(
            devices_in(&report, "smartctl/info"),
            vec!["ada0", "ada1", "ada2", "ses0"]
        );
        assert_eq!(
            devices_in(&report, "zpool/get"),
            vec![
                "capacity/tank",
                "feature@async_destroy/tank",
                "health/tank",
                "health/zroot"
            ]
        );

        assert!(!check_store(&store, Platform::Linux).is_complete());
    }

    #[test]
    fn test_report_json() {
        let store = FixtureStore::new(MockFs::freebsd_storage_host(), SCENARIO_ROOT);
        let json = serde_json::to_value(check_store(&store, Platform::Freebsd)).unwrap();
        assert_eq!(json["platform"], "freebsd");
        assert_eq!(json["entries"][0]["command"], "smartctl");
        assert_eq!(json["entries"][0]["coverage"]["kind"], "fixed");
        assert_eq!(json["entries"][0]["coverage"]["present"], true);
    }
}
