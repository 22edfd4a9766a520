use grc_core::gate::{GateKind, TOOL_READY};
use grc_core::presenter::Presenter;
use grc_core::session::Session;

use crate::context::{Ctx, Halted};

const TOKEN_PROMPT: &str = "Enter your GitHub access token:";

/// `grc-assist authenticate`: store a GitHub access token in GRC.
pub fn run(ctx: &mut Ctx, token: Option<String>) -> anyhow::Result<()> {
    ctx.require(TOOL_READY)?;
    let presenter = Presenter::new(&ctx.host, &ctx.prefs);
    let Some(token) = token.or_else(|| presenter.host().input(TOKEN_PROMPT)) else {
        return Ok(());
    };
    if perform(&mut ctx.session, &presenter, Some(token)) {
        Ok(())
    } else {
        Err(Halted.into())
    }
}

/// Authenticate with `token`, prompting for it when absent. Also used as
/// the "Authenticate" fix.
///
/// Dismissing the prompt returns `false` without a message.
pub fn perform(session: &mut Session, presenter: &Presenter<'_>, token: Option<String>) -> bool {
    let token = match token {
        Some(t) => t,
        None => match presenter.host().input(TOKEN_PROMPT) {
            Some(t) => t,
            None => return false,
        },
    };

    if let Err(e) = session.client().authenticate(&token) {
        tracing::warn!("grc authenticate failed: {e}");
        presenter.error_message("Authentication failed, check that your access token is valid.");
        return false;
    }

    session.invalidate(GateKind::Authentication);
    let user = session.client().user();
    presenter.status_line(user.as_ref());
    match user {
        Some(user) => {
            presenter.info(&format!("Authenticated as {}.", user.username));
            true
        }
        None => {
            presenter.error_message("GRC accepted the token but reports no authenticated user.");
            false
        }
    }
}
