use serde::Serialize;

use crate::error::ErrorKind;
use crate::memo::{CachedOutcome, MemoKey, SessionMemo};

// ---------------------------------------------------------------------------
// GateKind
// ---------------------------------------------------------------------------

/// A precondition that must hold before a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    Installation,
    Version,
    Authentication,
    NotARepository,
}

impl GateKind {
    /// Memo slot for this gate. `NotARepository` depends on the working
    /// directory and is checked every time.
    pub fn memo_key(&self) -> Option<MemoKey> {
        match self {
            GateKind::Installation => Some(MemoKey::Installation),
            GateKind::Version => Some(MemoKey::Version),
            GateKind::Authentication => Some(MemoKey::Authentication),
            GateKind::NotARepository => None,
        }
    }

    pub fn remediation(&self) -> Option<RemediationAction> {
        match self {
            GateKind::Installation => Some(RemediationAction::Install),
            GateKind::Version => Some(RemediationAction::Update),
            GateKind::Authentication => Some(RemediationAction::Authenticate),
            GateKind::NotARepository => None,
        }
    }
}

/// The gates every GRC command needs, in order. Later gates assume the
/// earlier ones hold.
pub const TOOL_READY: &[GateKind] = &[GateKind::Installation, GateKind::Version];

pub const AUTHENTICATED: &[GateKind] = &[
    GateKind::Installation,
    GateKind::Version,
    GateKind::Authentication,
];

pub const CREATE_REPOSITORY: &[GateKind] = &[
    GateKind::Installation,
    GateKind::Version,
    GateKind::Authentication,
    GateKind::NotARepository,
];

// ---------------------------------------------------------------------------
// RemediationAction
// ---------------------------------------------------------------------------

/// Follow-up command that can fix a failed gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationAction {
    Install,
    Authenticate,
    Update,
}

impl RemediationAction {
    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            RemediationAction::Install => "Install",
            RemediationAction::Authenticate => "Authenticate",
            RemediationAction::Update => "Update",
        }
    }

    /// The gate to re-check once this action has run.
    pub fn gate(&self) -> GateKind {
        match self {
            RemediationAction::Install => GateKind::Installation,
            RemediationAction::Authenticate => GateKind::Authentication,
            RemediationAction::Update => GateKind::Version,
        }
    }
}

// ---------------------------------------------------------------------------
// GateResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateResult {
    pub passed: bool,
    pub error_kind: Option<ErrorKind>,
    pub remediation: Option<RemediationAction>,
    pub failed_gate: Option<GateKind>,
    /// The caller asked for no notification about this result.
    pub suppressed: bool,
}

impl GateResult {
    pub fn pass(suppressed: bool) -> Self {
        Self {
            passed: true,
            error_kind: None,
            remediation: None,
            failed_gate: None,
            suppressed,
        }
    }

    /// No fix is offered for an unsupported platform; installing cannot help.
    pub fn fail(gate: GateKind, error: ErrorKind, suppressed: bool) -> Self {
        let remediation = match error {
            ErrorKind::UnsupportedPlatform => None,
            _ => gate.remediation(),
        };
        Self {
            passed: false,
            error_kind: Some(error),
            remediation,
            failed_gate: Some(gate),
            suppressed,
        }
    }
}

// ---------------------------------------------------------------------------
// GateChain
// ---------------------------------------------------------------------------

/// Performs the real (uncached) check behind a gate.
pub trait GateCheck {
    fn check(&mut self, gate: GateKind) -> Result<(), ErrorKind>;
}

/// Ordered, fail-fast evaluation of gates over a [`SessionMemo`].
#[derive(Debug, Clone, Default)]
pub struct GateChain {
    memo: SessionMemo,
}

impl GateChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memo(&self) -> &SessionMemo {
        &self.memo
    }

    /// Evaluate `gates` in order, stopping at the first failure.
    pub fn evaluate(
        &mut self,
        checker: &mut dyn GateCheck,
        gates: &[GateKind],
        suppress: bool,
    ) -> GateResult {
        for &gate in gates {
            if let Err(error) = self.evaluate_one(checker, gate) {
                tracing::debug!(?gate, %error, "gate failed");
                return GateResult::fail(gate, error, suppress);
            }
        }
        GateResult::pass(suppress)
    }

    fn evaluate_one(&mut self, checker: &mut dyn GateCheck, gate: GateKind) -> Result<(), ErrorKind> {
        let Some(key) = gate.memo_key() else {
            return checker.check(gate);
        };

        match self.memo.get(key) {
            CachedOutcome::Passed => {
                tracing::debug!(?gate, "memo hit: passed");
                return Ok(());
            }
            CachedOutcome::Failed(error) => {
                tracing::debug!(?gate, "memo hit: failed");
                return Err(error);
            }
            CachedOutcome::Unknown => {}
        }

        let result = checker.check(gate);
        let outcome = match &result {
            Ok(()) => CachedOutcome::Passed,
            Err(error) => CachedOutcome::Failed(error.clone()),
        };
        self.memo.set(key, outcome);
        result
    }

    /// Force the next evaluation of `gate` to run its real check.
    pub fn invalidate(&mut self, gate: GateKind) {
        if let Some(key) = gate.memo_key() {
            self.memo.invalidate(key);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Scripted checker that counts how often each gate really runs.
    #[derive(Default)]
    struct Scripted {
        failures: HashMap<GateKind, ErrorKind>,
        calls: HashMap<GateKind, u32>,
    }

    impl Scripted {
        fn failing(gate: GateKind, error: ErrorKind) -> Self {
            let mut s = Self::default();
            s.failures.insert(gate, error);
            s
        }

        fn calls(&self, gate: GateKind) -> u32 {
            self.calls.get(&gate).copied().unwrap_or(0)
        }
    }

    impl GateCheck for Scripted {
        fn check(&mut self, gate: GateKind) -> Result<(), ErrorKind> {
            *self.calls.entry(gate).or_default() += 1;
            match self.failures.get(&gate) {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn all_passing() {
        let mut chain = GateChain::new();
        let mut checker = Scripted::default();
        let result = chain.evaluate(&mut checker, CREATE_REPOSITORY, false);
        assert!(result.passed);
        assert!(result.error_kind.is_none());
        for gate in CREATE_REPOSITORY {
            assert_eq!(checker.calls(*gate), 1);
        }
    }

    #[test]
    fn short_circuits_on_first_failure() {
        let mut chain = GateChain::new();
        let mut checker = Scripted::failing(GateKind::Installation, ErrorKind::NotInstalled);
        let result = chain.evaluate(&mut checker, AUTHENTICATED, false);

        assert!(!result.passed);
        assert_eq!(result.failed_gate, Some(GateKind::Installation));
        assert_eq!(result.error_kind, Some(ErrorKind::NotInstalled));
        assert_eq!(result.remediation, Some(RemediationAction::Install));
        assert_eq!(checker.calls(GateKind::Installation), 1);
        assert_eq!(checker.calls(GateKind::Version), 0);
        assert_eq!(checker.calls(GateKind::Authentication), 0);
    }

    #[test]
    fn memoized_failure_is_not_rechecked() {
        let mut chain = GateChain::new();
        let mut checker = Scripted::failing(GateKind::Authentication, ErrorKind::NotAuthenticated);

        let first = chain.evaluate(&mut checker, AUTHENTICATED, false);
        let second = chain.evaluate(&mut checker, AUTHENTICATED, true);

        assert_eq!(first.error_kind, Some(ErrorKind::NotAuthenticated));
        assert_eq!(second.error_kind, Some(ErrorKind::NotAuthenticated));
        assert!(second.suppressed);
        assert_eq!(checker.calls(GateKind::Installation), 1);
        assert_eq!(checker.calls(GateKind::Version), 1);
        assert_eq!(checker.calls(GateKind::Authentication), 1);
    }

    #[test]
    fn invalidate_forces_recheck() {
        let mut chain = GateChain::new();
        let mut checker = Scripted::failing(GateKind::Installation, ErrorKind::NotInstalled);

        chain.evaluate(&mut checker, &[GateKind::Installation], false);
        chain.invalidate(GateKind::Installation);
        checker.failures.clear();
        let result = chain.evaluate(&mut checker, &[GateKind::Installation], false);

        assert!(result.passed);
        assert_eq!(checker.calls(GateKind::Installation), 2);
    }

    #[test]
    fn not_a_repository_is_never_memoized() {
        let mut chain = GateChain::new();
        let mut checker =
            Scripted::failing(GateKind::NotARepository, ErrorKind::AlreadyARepository);

        let result = chain.evaluate(&mut checker, &[GateKind::NotARepository], false);
        assert_eq!(result.remediation, None);
        chain.evaluate(&mut checker, &[GateKind::NotARepository], false);
        assert_eq!(checker.calls(GateKind::NotARepository), 2);
    }

    #[test]
    fn version_failure_offers_update() {
        let mut chain = GateChain::new();
        let mismatch = ErrorKind::VersionMismatch {
            expected: "v3.0.2".into(),
            actual: None,
        };
        let mut checker = Scripted::failing(GateKind::Version, mismatch.clone());
        let result = chain.evaluate(&mut checker, TOOL_READY, false);
        assert_eq!(result.error_kind, Some(mismatch));
        assert_eq!(result.remediation, Some(RemediationAction::Update));
    }

    #[test]
    fn remediation_targets_its_gate() {
        for gate in [
            GateKind::Installation,
            GateKind::Version,
            GateKind::Authentication,
        ] {
            let action = gate.remediation().unwrap();
            assert_eq!(action.gate(), gate);
        }
    }
}
