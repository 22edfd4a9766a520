use grc_core::gate::{GateKind, AUTHENTICATED, TOOL_READY};
use grc_core::memo::{CachedOutcome, MemoKey};
use grc_core::paths;
use grc_core::presenter::Presenter;

use crate::context::{Ctx, Halted};
use crate::output::{print_json, print_table};

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

/// `grc-assist status`: the GRC executable, its version and the signed-in user.
/// Reports only; never offers fixes.
pub fn run(ctx: &mut Ctx) -> anyhow::Result<()> {
    let workdir = ctx.session.workdir().to_path_buf();
    let expected = ctx.prefs.expected_version.clone();
    let grc = ctx.session.client();

    let executable = grc.executable();
    let (version, user) = if executable.is_some() {
        let version = grc.version();
        let user = grc.user();
        (version, user)
    } else {
        (None, None)
    };
    let repository = paths::is_git_repository(&workdir);

    if ctx.json {
        return print_json(&serde_json::json!({
            "executable": executable,
            "version": version,
            "expected_version": expected,
            "user": user,
            "workdir": workdir,
            "git_repository": repository,
        }));
    }

    let none = || "-".to_string();
    let rows = vec![
        vec![
            "executable".to_string(),
            executable
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "not installed".to_string()),
        ],
        vec!["version".to_string(), version.unwrap_or_else(none)],
        vec!["expected".to_string(), expected],
        vec![
            "user".to_string(),
            user.map(|u| u.username).unwrap_or_else(none),
        ],
        vec![
            "repository".to_string(),
            if repository { "yes" } else { "no" }.to_string(),
        ],
    ];
    print_table(&["ITEM", "VALUE"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// whoami
// ---------------------------------------------------------------------------

/// `grc-assist whoami`: show the authenticated GitHub account, offering to
/// authenticate when there is none.
pub fn whoami(ctx: &mut Ctx) -> anyhow::Result<()> {
    ctx.require(TOOL_READY)?;

    let presenter = Presenter::new(&ctx.host, &ctx.prefs);
    let user = if ctx.session.evaluate(&[GateKind::Authentication], true).passed {
        ctx.session.client().user()
    } else {
        None
    };
    presenter.status_line(user.as_ref());

    if ctx.json {
        if let Some(user) = &user {
            return print_json(user);
        }
    }

    match presenter.authentication(user.as_ref(), false) {
        Some(_) if super::authenticate::perform(&mut ctx.session, &presenter, None) => Ok(()),
        Some(_) => Err(Halted.into()),
        None if user.is_some() => Ok(()),
        None => Err(Halted.into()),
    }
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

const REPORTED: [MemoKey; 3] = [MemoKey::Installation, MemoKey::Version, MemoKey::Authentication];

/// `grc-assist check`: run the startup pre-checks on demand and report
/// what each one recorded.
pub fn check(ctx: &mut Ctx) -> anyhow::Result<()> {
    let result = ctx.session.evaluate(AUTHENTICATED, true);
    let memo = ctx.session.memo();
    let outcomes: Vec<(MemoKey, CachedOutcome)> =
        REPORTED.iter().map(|&key| (key, memo.last_known(key))).collect();

    if ctx.json {
        let checks: Vec<serde_json::Value> = outcomes
            .iter()
            .map(|(key, outcome)| serde_json::json!({ "check": key, "outcome": outcome }))
            .collect();
        print_json(&serde_json::json!({ "passed": result.passed, "checks": checks }))?;
    } else {
        let rows = outcomes
            .iter()
            .map(|(key, outcome)| vec![check_name(*key).to_string(), describe(outcome)])
            .collect();
        print_table(&["CHECK", "OUTCOME"], rows);
    }

    if result.passed {
        Ok(())
    } else {
        Err(Halted.into())
    }
}

fn check_name(key: MemoKey) -> &'static str {
    match key {
        MemoKey::Installation => "installation",
        MemoKey::Version => "version",
        MemoKey::Authentication => "authentication",
    }
}

fn describe(outcome: &CachedOutcome) -> String {
    match outcome {
        CachedOutcome::Unknown => "skipped".to_string(),
        CachedOutcome::Passed => "passed".to_string(),
        CachedOutcome::Failed(e) => format!("failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grc_core::ErrorKind;

    #[test]
    fn describe_outcomes() {
        assert_eq!(describe(&CachedOutcome::Unknown), "skipped");
        assert_eq!(describe(&CachedOutcome::Passed), "passed");
        assert_eq!(
            describe(&CachedOutcome::Failed(ErrorKind::NotAuthenticated)),
            format!("failed: {}", ErrorKind::NotAuthenticated)
        );
    }
}
