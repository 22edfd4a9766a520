use serde::Serialize;
use thiserror::Error;

/// Why a gate or a command flow stopped.
///
/// The `Display` text is what the user sees; logic matches on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("GitHub Repository Creator (GRC) is not installed.")]
    NotInstalled,

    #[error("GitHub Repository Creator (GRC) is not supported on this OS.")]
    UnsupportedPlatform,

    #[error(
        "GRC version is not supported. Expected: {expected}, Actual: {}.",
        .actual.as_deref().unwrap_or("unknown")
    )]
    VersionMismatch {
        expected: String,
        actual: Option<String>,
    },

    #[error("You are not authenticated with GRC. Please authenticate first.")]
    NotAuthenticated,

    #[error("The working directory is already a git repository.")]
    AlreadyARepository,

    #[error("GRC command failed: {0}")]
    CommandFailed(String),

    #[error("input cancelled")]
    InputCancelled,
}

#[derive(Debug, Error)]
pub enum GrcError {
    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("invalid preferences file {path}: {source}")]
    InvalidPreferences {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, GrcError>;
