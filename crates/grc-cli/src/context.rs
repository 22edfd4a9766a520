use std::fmt;
use std::path::PathBuf;

use anyhow::Context as _;
use grc_core::checks::{self, Remediator};
use grc_core::client::GrcClient;
use grc_core::config::Preferences;
use grc_core::gate::{GateKind, RemediationAction};
use grc_core::invoker::ProcessInvoker;
use grc_core::paths;
use grc_core::presenter::Presenter;
use grc_core::probe::{Platform, SystemProbe};
use grc_core::session::Session;
use grc_core::ErrorKind;

use crate::cmd;
use crate::host::TerminalHost;

/// A flow stopped after the user was already told why.
#[derive(Debug)]
pub struct Halted;

impl fmt::Display for Halted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("command halted")
    }
}

impl std::error::Error for Halted {}

/// Report `error` and stop the flow. Cancellation stops quietly with success.
pub fn halt_on(presenter: &Presenter<'_>, error: ErrorKind) -> anyhow::Result<()> {
    if error == ErrorKind::InputCancelled {
        return Ok(());
    }
    presenter.error(&error);
    Err(Halted.into())
}

pub struct Ctx {
    pub session: Session,
    pub prefs: Preferences,
    pub prefs_path: Option<PathBuf>,
    pub host: TerminalHost,
    pub platform: Platform,
    pub json: bool,
}

pub struct CtxOptions {
    pub workdir: PathBuf,
    pub config: Option<PathBuf>,
    pub grc: Option<PathBuf>,
    pub assume_yes: bool,
    pub json: bool,
}

impl Ctx {
    pub fn build(opts: CtxOptions) -> anyhow::Result<Self> {
        let prefs_path = match opts.config {
            Some(path) => Some(path),
            None => paths::preferences_path().ok(),
        };
        let prefs = match &prefs_path {
            Some(path) => Preferences::load(path)
                .with_context(|| format!("failed to load preferences from {}", path.display()))?,
            None => {
                tracing::warn!("home directory not found, using default preferences");
                Preferences::default()
            }
        };

        let platform = Platform::current();
        let probe = SystemProbe::new(platform).with_override(opts.grc.or_else(|| prefs.executable.clone()));
        let invoker = ProcessInvoker::new().echo_commands(prefs.show_commands_being_used);
        let client = GrcClient::new(Box::new(probe), Box::new(invoker));
        let session = Session::new(client, opts.workdir, prefs.expected_version.clone());

        Ok(Self {
            session,
            prefs,
            prefs_path,
            host: TerminalHost::new(opts.assume_yes),
            platform,
            json: opts.json,
        })
    }

    /// Evaluate `gates`, offering a fix on failure. Errors with [`Halted`]
    /// when a gate fails.
    pub fn require(&mut self, gates: &[GateKind]) -> anyhow::Result<()> {
        let presenter = Presenter::new(&self.host, &self.prefs);
        let mut remediator = CliRemediator {
            presenter: &presenter,
            platform: self.platform,
        };
        if checks::require(&mut self.session, &presenter, gates, false, &mut remediator) {
            Ok(())
        } else {
            Err(Halted.into())
        }
    }

    /// Silent startup pre-check, when the user allows it.
    pub fn pre_check(&mut self) {
        if !self.prefs.allow_pre_checks_on_startup {
            return;
        }
        let presenter = Presenter::new(&self.host, &self.prefs);
        checks::pre_check(&mut self.session, &presenter);
    }
}

struct CliRemediator<'p, 'h> {
    presenter: &'p Presenter<'h>,
    platform: Platform,
}

impl Remediator for CliRemediator<'_, '_> {
    fn remediate(&mut self, session: &mut Session, action: RemediationAction) -> bool {
        match action {
            RemediationAction::Install => cmd::install::perform(session, self.presenter, self.platform),
            RemediationAction::Authenticate => cmd::authenticate::perform(session, self.presenter, None),
            RemediationAction::Update => cmd::update::perform(session, self.presenter),
        }
    }
}
