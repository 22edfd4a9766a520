use grc_core::installer::InstallStatus;
use grc_core::presenter::Presenter;
use grc_core::probe::Platform;
use grc_core::session::Session;

use crate::context::{Ctx, Halted};

/// `grc-assist install`: run the upstream GRC install script.
pub fn run(ctx: &mut Ctx) -> anyhow::Result<()> {
    let presenter = Presenter::new(&ctx.host, &ctx.prefs);
    if perform(&mut ctx.session, &presenter, ctx.platform) {
        Ok(())
    } else {
        Err(Halted.into())
    }
}

/// Install GRC and report the result. Also used as the "Install" fix.
pub fn perform(session: &mut Session, presenter: &Presenter<'_>, platform: Platform) -> bool {
    if platform == Platform::Unsupported {
        presenter.error(&grc_core::ErrorKind::UnsupportedPlatform);
        return false;
    }
    match session.install(platform) {
        status @ (InstallStatus::AlreadyInstalled | InstallStatus::Success) => {
            presenter.info(status.message());
            true
        }
        InstallStatus::Error => {
            presenter.error_message(InstallStatus::Error.message());
            false
        }
    }
}
