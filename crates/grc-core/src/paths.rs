use crate::error::{GrcError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CONFIG_DIR: &str = ".grc-assist";
pub const PREFERENCES_FILE: &str = "preferences.yaml";
pub const GIT_DIR: &str = ".git";

pub const INSTALL_SCRIPT_UNIX: &str =
    "https://raw.githubusercontent.com/ArthurSudbrackIbarra/GitHub-Repo-Creator/main/grc-install.sh";
pub const INSTALL_SCRIPT_WINDOWS: &str =
    "https://raw.githubusercontent.com/ArthurSudbrackIbarra/GitHub-Repo-Creator/main/grc-install.ps1";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_dir() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(GrcError::HomeNotFound)?;
    Ok(home.join(CONFIG_DIR))
}

pub fn preferences_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(PREFERENCES_FILE))
}

/// True when `dir` already holds a git repository.
pub fn is_git_repository(dir: &Path) -> bool {
    dir.join(GIT_DIR).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn detects_git_dir() {
        let dir = TempDir::new().unwrap();
        assert!(!is_git_repository(dir.path()));
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        assert!(is_git_repository(dir.path()));
    }

    #[test]
    fn git_worktree_file_counts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".git"), "gitdir: ../main/.git/worktrees/x\n").unwrap();
        assert!(is_git_repository(dir.path()));
    }

    #[test]
    fn preferences_live_under_config_dir() {
        if let (Ok(dir), Ok(file)) = (config_dir(), preferences_path()) {
            assert_eq!(file, dir.join(PREFERENCES_FILE));
        }
    }
}
