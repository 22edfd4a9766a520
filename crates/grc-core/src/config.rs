use crate::error::{GrcError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// GRC release this crate's parsers and command shapes target.
pub const EXPECTED_GRC_VERSION: &str = "v3.0.2";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// User preferences, read once at startup and static for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preferences {
    #[serde(default = "default_true")]
    pub show_error_messages: bool,
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
    #[serde(default = "default_true")]
    pub allow_pre_checks_on_startup: bool,
    #[serde(default)]
    pub show_commands_being_used: bool,
    #[serde(default = "default_expected_version")]
    pub expected_version: String,
    /// Explicit GRC executable; skips the `PATH` lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_expected_version() -> String {
    EXPECTED_GRC_VERSION.to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_error_messages: true,
            show_status_bar: true,
            allow_pre_checks_on_startup: true,
            show_commands_being_used: false,
            expected_version: default_expected_version(),
            executable: None,
        }
    }
}

impl Preferences {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no preferences file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&data).map_err(|source| GrcError::InvalidPreferences {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.expected_version.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "expected_version is empty; every version check would fail".to_string(),
            });
        } else if !self.expected_version.starts_with(['v', 'V']) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "expected_version '{}' has no 'v' prefix; GRC reports versions like {}",
                    self.expected_version, EXPECTED_GRC_VERSION
                ),
            });
        }

        if let Some(exe) = &self.executable {
            if !exe.is_file() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("executable '{}' does not exist", exe.display()),
                });
            }
        }

        if !self.show_error_messages {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "show_error_messages is off; failed checks will not offer fixes"
                    .to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
