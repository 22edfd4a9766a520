use std::path::{Path, PathBuf};

/// Resolve the working directory GRC commands run in.
///
/// Priority:
/// 1. `--dir` flag (passed in as `explicit`)
/// 2. The current directory
///
/// Never walks upward looking for `.git/`.
pub fn resolve_workdir(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
