//! Platform identifiers used as the first level of the fixture store.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Operating system whose command output a fixture was captured from.
///
/// The lowercase name doubles as the directory name under the fixture root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Darwin,
    Linux,
    Freebsd,
    Openbsd,
}

impl Platform {
    /// All known platforms, in directory listing order.
    pub const ALL: [Platform; 4] = [
        Platform::Darwin,
        Platform::Linux,
        Platform::Freebsd,
        Platform::Openbsd,
    ];

    /// Directory name of this platform in the fixture store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
            Platform::Freebsd => "freebsd",
            Platform::Openbsd => "openbsd",
        }
    }

    /// Platform of the running host, if it is one we keep fixtures for.
    pub fn host() -> Option<Platform> {
        match std::env::consts::OS {
            "macos" => Some(Platform::Darwin),
            "linux" => Some(Platform::Linux),
            "freebsd" => Some(Platform::Freebsd),
            "openbsd" => Some(Platform::Openbsd),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a platform name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatform(pub String);

impl fmt::Display for UnknownPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown platform '{}' (expected one of: darwin, linux, freebsd, openbsd)",
            self.0
        )
    }
}

impl std::error::Error for UnknownPlatform {}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" => Ok(Platform::Darwin),
            "linux" => Ok(Platform::Linux),
            "freebsd" => Ok(Platform::Freebsd),
            "openbsd" => Ok(Platform::Openbsd),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}
