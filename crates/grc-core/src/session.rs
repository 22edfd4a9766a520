use std::path::{Path, PathBuf};

use crate::client::GrcClient;
use crate::error::ErrorKind;
use crate::gate::{GateChain, GateCheck, GateKind, GateResult};
use crate::installer::{self, InstallStatus};
use crate::memo::SessionMemo;
use crate::paths;
use crate::probe::Platform;

/// Everything one run of the program knows about GRC.
///
/// Owns the client (and its caches) together with the gate chain (and its
/// memo), so invalidation always clears both in one place.
pub struct Session {
    client: GrcClient,
    chain: GateChain,
    workdir: PathBuf,
    expected_version: String,
}

impl Session {
    pub fn new(client: GrcClient, workdir: impl Into<PathBuf>, expected_version: impl Into<String>) -> Self {
        Self {
            client,
            chain: GateChain::new(),
            workdir: workdir.into(),
            expected_version: expected_version.into(),
        }
    }

    pub fn client(&mut self) -> &mut GrcClient {
        &mut self.client
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn memo(&self) -> &SessionMemo {
        self.chain.memo()
    }

    pub fn evaluate(&mut self, gates: &[GateKind], suppress: bool) -> GateResult {
        let mut checker = Checker {
            client: &mut self.client,
            workdir: &self.workdir,
            expected_version: &self.expected_version,
        };
        self.chain.evaluate(&mut checker, gates, suppress)
    }

    pub fn invalidate(&mut self, gate: GateKind) {
        self.chain.invalidate(gate);
        self.client.forget(gate);
    }

    /// Run the platform install script, then re-probe on next use.
    pub fn install(&mut self, platform: Platform) -> InstallStatus {
        let target_dir = std::env::temp_dir();
        let status = installer::install(self.client.location(), platform, &target_dir);
        if status == InstallStatus::Success {
            self.invalidate(GateKind::Installation);
            self.invalidate(GateKind::Version);
        }
        status
    }
}

struct Checker<'a> {
    client: &'a mut GrcClient,
    workdir: &'a Path,
    expected_version: &'a str,
}

impl GateCheck for Checker<'_> {
    fn check(&mut self, gate: GateKind) -> Result<(), ErrorKind> {
        match gate {
            GateKind::Installation => match self.client.location().error() {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            },
            GateKind::Version => {
                let actual = self.client.version();
                let supported = actual
                    .as_deref()
                    .is_some_and(|v| v.eq_ignore_ascii_case(self.expected_version));
                if supported {
                    Ok(())
                } else {
                    Err(ErrorKind::VersionMismatch {
                        expected: self.expected_version.to_string(),
                        actual,
                    })
                }
            }
            GateKind::Authentication => {
                if self.client.is_authenticated() {
                    Ok(())
                } else {
                    Err(ErrorKind::NotAuthenticated)
                }
            }
            GateKind::NotARepository => {
                if paths::is_git_repository(self.workdir) {
                    Err(ErrorKind::AlreadyARepository)
                } else {
                    Ok(())
                }
            }
        }
    }
}
