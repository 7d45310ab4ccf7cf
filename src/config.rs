//! Runtime configuration for the mock executables.
//!
//! The mocks cannot take flags of their own because their whole argument
//! vector belongs to the command being mocked, so configuration comes from
//! the environment.

use std::fmt;
use std::path::PathBuf;

use crate::platform::{Platform, UnknownPlatform};

/// Fixture root directory (`<test-root>/data/mock-output`).
pub const ENV_FIXTURE_ROOT: &str = "CMDMOCK_FIXTURE_ROOT";
/// Platform directory to read fixtures from.
pub const ENV_PLATFORM: &str = "CMDMOCK_PLATFORM";
/// `tracing` filter directives for the mocks' stderr diagnostics.
pub const ENV_LOG: &str = "CMDMOCK_LOG";

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The fixture root variable is unset or empty.
    MissingFixtureRoot,
    /// No platform was given and the host OS has no fixture directory.
    UnsupportedHost(&'static str),
    /// The platform variable names an unknown platform.
    Platform(UnknownPlatform),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingFixtureRoot => {
                write!(f, "{} is not set", ENV_FIXTURE_ROOT)
            }
            ConfigError::UnsupportedHost(os) => write!(
                f,
                "host OS '{}' has no fixture platform; set {}",
                os, ENV_PLATFORM
            ),
            ConfigError::Platform(e) => write!(f, "{}: {}", ENV_PLATFORM, e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<UnknownPlatform> for ConfigError {
    fn from(e: UnknownPlatform) -> Self {
        ConfigError::Platform(e)
    }
}

/// Where the mocks read fixtures from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    pub fixture_root: PathBuf,
    pub platform: Platform,
}

impl MockConfig {
    pub fn new(fixture_root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            fixture_root: fixture_root.into(),
            platform,
        }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let fixture_root = lookup(ENV_FIXTURE_ROOT)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingFixtureRoot)?;

        let platform = match lookup(ENV_PLATFORM).filter(|value| !value.is_empty()) {
            Some(name) => name.parse()?,
            None => default_platform()?,
        };

        Ok(Self {
            fixture_root,
            platform,
        })
    }
}

/// Platform used when none is configured: the host's own.
pub fn default_platform() -> Result<Platform, ConfigError> {
    Platform::host().ok_or(ConfigError::UnsupportedHost(std::env::consts::OS))
}
