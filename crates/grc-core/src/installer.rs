//! Installing GRC with its upstream install scripts.
//!
//! The scripts need the terminal (`sudo` may prompt), so they run with
//! inherited stdio. What the scripts do is up to upstream.

use std::path::Path;
use std::process::Command;

use serde::Serialize;

use crate::paths::{INSTALL_SCRIPT_UNIX, INSTALL_SCRIPT_WINDOWS};
use crate::probe::{ExecutableLocation, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStatus {
    AlreadyInstalled,
    Success,
    Error,
}

impl InstallStatus {
    pub fn message(&self) -> &'static str {
        match self {
            InstallStatus::AlreadyInstalled => {
                "GitHub Repository Creator (GRC) is already installed."
            }
            InstallStatus::Success => "GitHub Repository Creator (GRC) was installed successfully.",
            InstallStatus::Error => "Could not install GitHub Repository Creator (GRC).",
        }
    }
}

/// The command that runs the install script for `platform`, if there is one.
pub fn install_command(platform: Platform, target_dir: &Path) -> Option<Command> {
    let mut cmd = match platform {
        Platform::Windows => {
            let mut cmd = Command::new("powershell.exe");
            cmd.args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command"]);
            cmd.arg(format!(
                "iex ((New-Object System.Net.WebClient).DownloadString('{INSTALL_SCRIPT_WINDOWS}'))"
            ));
            cmd
        }
        Platform::Linux | Platform::MacOs => {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(format!(
                "curl -fsSL {INSTALL_SCRIPT_UNIX} -o grc-install.sh && sudo bash ./grc-install.sh; status=$?; rm -f grc-install.sh; exit $status"
            ));
            cmd
        }
        Platform::Unsupported => return None,
    };
    cmd.current_dir(target_dir);
    Some(cmd)
}

/// Install GRC unless `location` says it is already there.
pub fn install(location: &ExecutableLocation, platform: Platform, target_dir: &Path) -> InstallStatus {
    if location.is_installed() {
        return InstallStatus::AlreadyInstalled;
    }
    let Some(mut cmd) = install_command(platform, target_dir) else {
        tracing::warn!(?platform, "no install script for this platform");
        return InstallStatus::Error;
    };
    match cmd.status() {
        Ok(status) if status.success() => InstallStatus::Success,
        Ok(status) => {
            tracing::warn!(%status, "grc install script failed");
            InstallStatus::Error
        }
        Err(e) => {
            tracing::warn!("failed to start grc install script: {e}");
            InstallStatus::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn already_installed_short_circuits() {
        let loc = ExecutableLocation::found("/usr/local/bin/grc");
        assert_eq!(
            install(&loc, Platform::Unsupported, Path::new(".")),
            InstallStatus::AlreadyInstalled
        );
    }

    #[test]
    fn unsupported_platform_cannot_install() {
        let loc = ExecutableLocation::missing(ErrorKind::UnsupportedPlatform);
        assert_eq!(
            install(&loc, Platform::Unsupported, Path::new(".")),
            InstallStatus::Error
        );
        assert!(install_command(Platform::Unsupported, Path::new(".")).is_none());
    }

    #[test]
    fn unix_command_fetches_shell_script() {
        let cmd = install_command(Platform::Linux, Path::new("/tmp")).unwrap();
        assert_eq!(cmd.get_program(), "sh");
        let script = cmd.get_args().nth(1).unwrap().to_string_lossy().into_owned();
        assert!(script.contains(INSTALL_SCRIPT_UNIX));
        assert!(script.contains("rm -f grc-install.sh"));
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/tmp")));
    }

    #[test]
    fn windows_command_uses_powershell() {
        let cmd = install_command(Platform::Windows, Path::new("C:\\grc")).unwrap();
        assert_eq!(cmd.get_program(), "powershell.exe");
        let last = cmd.get_args().last().unwrap().to_string_lossy().into_owned();
        assert!(last.contains(INSTALL_SCRIPT_WINDOWS));
    }

    #[test]
    fn status_messages() {
        assert!(InstallStatus::Success.message().contains("installed successfully"));
        assert!(InstallStatus::Error.message().starts_with("Could not install"));
    }
}
