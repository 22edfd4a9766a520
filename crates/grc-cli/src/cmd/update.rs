use grc_core::gate::GateKind;
use grc_core::presenter::Presenter;
use grc_core::session::Session;

use crate::context::{Ctx, Halted};

/// `grc-assist update`: update GRC to the latest release.
pub fn run(ctx: &mut Ctx) -> anyhow::Result<()> {
    ctx.require(&[GateKind::Installation])?;
    let presenter = Presenter::new(&ctx.host, &ctx.prefs);
    if perform(&mut ctx.session, &presenter) {
        Ok(())
    } else {
        Err(Halted.into())
    }
}

/// Run `grc update` and report. Also used as the "Update" fix.
pub fn perform(session: &mut Session, presenter: &Presenter<'_>) -> bool {
    match session.client().update() {
        Ok(()) => {
            session.invalidate(GateKind::Version);
            presenter.info("GRC version updated.");
            true
        }
        Err(e) => {
            tracing::warn!("grc update failed: {e}");
            presenter.error_message("GRC version could not be updated.");
            false
        }
    }
}
