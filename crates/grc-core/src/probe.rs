//! Locating the GRC executable on the host.
//!
//! Each OS family has its own lookup: `grc.bat` on Windows, `grc` on Linux
//! and macOS. Lookup failures of any kind collapse into
//! [`ErrorKind::NotInstalled`]; they are never propagated.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ErrorKind;

/// The host OS family, as far as GRC cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Unsupported,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unsupported
        }
    }

    /// Name of the executable to look up on `PATH`.
    pub fn executable_name(&self) -> Option<&'static str> {
        match self {
            Platform::Windows => Some("grc.bat"),
            Platform::Linux | Platform::MacOs => Some("grc"),
            Platform::Unsupported => None,
        }
    }
}

/// Result of one probe. Exactly one of `path` and `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutableLocation {
    path: Option<PathBuf>,
    error: Option<ErrorKind>,
}

impl ExecutableLocation {
    pub fn found(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            error: None,
        }
    }

    pub fn missing(error: ErrorKind) -> Self {
        Self {
            path: None,
            error: Some(error),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn error(&self) -> Option<&ErrorKind> {
        self.error.as_ref()
    }

    pub fn is_installed(&self) -> bool {
        self.path.is_some()
    }
}

pub trait Probe {
    fn locate(&self) -> ExecutableLocation;
}

/// Looks GRC up on the real host.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    platform: Platform,
    override_path: Option<PathBuf>,
}

impl SystemProbe {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            override_path: None,
        }
    }

    /// Use `path` instead of searching `PATH`. The file must exist.
    pub fn with_override(mut self, path: Option<PathBuf>) -> Self {
        self.override_path = path;
        self
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

impl Probe for SystemProbe {
    fn locate(&self) -> ExecutableLocation {
        let Some(name) = self.platform.executable_name() else {
            return ExecutableLocation::missing(ErrorKind::UnsupportedPlatform);
        };

        if let Some(path) = &self.override_path {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "using configured grc executable");
                return ExecutableLocation::found(path.clone());
            }
            tracing::warn!(path = %path.display(), "configured grc executable does not exist");
            return ExecutableLocation::missing(ErrorKind::NotInstalled);
        }

        match which::which(name) {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "located grc");
                ExecutableLocation::found(path)
            }
            Err(e) => {
                tracing::warn!("lookup of {name} failed: {e}");
                ExecutableLocation::missing(ErrorKind::NotInstalled)
            }
        }
    }
}
