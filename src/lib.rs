//! cmdmock - replay recorded OS command output in tests.
//!
//! Wrappers around tools such as `smartctl`, `zfs`, or `df` are hard to test
//! against the real commands: they need root, specific hardware, and give
//! different answers on every machine. cmdmock builds stand-in executables
//! under the same names. Put them first on `PATH` and each one answers a
//! known invocation with the exact bytes recorded in a fixture file.
//!
//! Provides:
//! - `rules` - declarative argument-vector rules, first match wins
//! - `commands` - the mocked commands and their rule tables
//! - `fixture` - fixture store layout and filesystem access (real and mock)
//! - `dispatch` - the request/response cycle shared by the mock binaries
//! - `config` - environment-based configuration
//! - `install` - putting the mocks on a search path
//! - `check` - fixture store coverage report
//! - `platform` - platform identifiers
//!
//! ```
//! use cmdmock::commands::MockCommand;
//! use cmdmock::dispatch::Dispatcher;
//! use cmdmock::fixture::{FixtureStore, MockFs, SCENARIO_ROOT};
//! use cmdmock::platform::Platform;
//!
//! let store = FixtureStore::new(MockFs::freebsd_storage_host(), SCENARIO_ROOT);
//! let smartctl = Dispatcher::new(MockCommand::Smartctl, Platform::Freebsd, store);
//!
//! let health = smartctl.respond(&["--health", "/dev/ada0"]).unwrap();
//! assert!(String::from_utf8(health).unwrap().contains("PASSED"));
//! assert!(smartctl.respond(&["--unknown-flag"]).is_err());
//! ```

pub mod check;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod fixture;
pub mod install;
pub mod logging;
pub mod platform;
pub mod rules;
