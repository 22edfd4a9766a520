//! Gate evaluation wired to the presenter and to remediation.

use crate::gate::{GateKind, RemediationAction, AUTHENTICATED};
use crate::presenter::Presenter;
use crate::session::Session;

/// Runs a remediation the user accepted (install, authenticate, update).
pub trait Remediator {
    /// Returns whether the remediation completed.
    fn remediate(&mut self, session: &mut Session, action: RemediationAction) -> bool;
}

/// Evaluate `gates`; on failure tell the user and, if they accept the
/// offered fix, run it once. A completed fix invalidates the gate it targets.
///
/// Returns whether every gate passed. A remediation never retries the
/// command that was blocked; the user runs it again.
pub fn require(
    session: &mut Session,
    presenter: &Presenter<'_>,
    gates: &[GateKind],
    suppress: bool,
    remediator: &mut dyn Remediator,
) -> bool {
    let result = session.evaluate(gates, suppress);
    if result.passed {
        return true;
    }
    if let Some(action) = presenter.gate(&result) {
        tracing::debug!(?action, "running remediation");
        let completed = remediator.remediate(session, action);
        tracing::debug!(?action, completed, "remediation finished");
        if completed {
            session.invalidate(action.gate());
        }
    }
    false
}

pub fn check_installation(
    session: &mut Session,
    presenter: &Presenter<'_>,
    suppress: bool,
    remediator: &mut dyn Remediator,
) -> bool {
    require(session, presenter, &[GateKind::Installation], suppress, remediator)
}

/// Warm the memo without notifying anyone and refresh the status line.
///
/// Later gate evaluations in the same session reuse these outcomes, so the
/// pre-check costs no extra spawns.
pub fn pre_check(session: &mut Session, presenter: &Presenter<'_>) {
    let result = session.evaluate(AUTHENTICATED, true);
    tracing::debug!(passed = result.passed, failed_gate = ?result.failed_gate, "startup pre-check");
    let user = if result.passed {
        session.client().user()
    } else {
        None
    };
    if result.failed_gate != Some(GateKind::Installation) {
        presenter.status_line(user.as_ref());
    }
}
