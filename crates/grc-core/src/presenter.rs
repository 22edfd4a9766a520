//! Turning gate and command outcomes into user-visible notifications.
//!
//! [`Host`] is the only seam to the UI. Nothing else in this crate prints or
//! prompts; the gate chain returns data and the presenter decides what the
//! user sees.

use serde::Serialize;

use crate::config::Preferences;
use crate::error::ErrorKind;
use crate::gate::{GateResult, RemediationAction};
use crate::parse::GrcUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// A button offered alongside a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FollowUp {
    Remediate { action: RemediationAction },
    OpenUrl { url: String },
}

impl FollowUp {
    pub fn label(&self) -> &str {
        match self {
            FollowUp::Remediate { action } => action.label(),
            FollowUp::OpenUrl { .. } => "Open in Browser",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub actions: Vec<FollowUp>,
}

/// The UI the presenter drives.
pub trait Host {
    /// Show a notification. Returns the index of the accepted action, if any.
    fn notify(&self, notification: &Notification) -> Option<usize>;

    /// Ask for free text. `None` means the user dismissed the prompt.
    fn input(&self, prompt: &str) -> Option<String>;

    /// Ask the user to choose one of `items`. `None` means dismissed.
    fn pick(&self, prompt: &str, items: &[String]) -> Option<String>;

    /// Replace the persistent status line.
    fn status(&self, text: &str);
}

pub struct Presenter<'a> {
    host: &'a dyn Host,
    prefs: &'a Preferences,
}

impl<'a> Presenter<'a> {
    pub fn new(host: &'a dyn Host, prefs: &'a Preferences) -> Self {
        Self { host, prefs }
    }

    pub fn host(&self) -> &'a dyn Host {
        self.host
    }

    /// Report a failed gate. Returns the remediation if the user accepted it.
    pub fn gate(&self, result: &GateResult) -> Option<RemediationAction> {
        if result.passed || result.suppressed || !self.prefs.show_error_messages {
            return None;
        }
        let error = result.error_kind.as_ref()?;
        if *error == ErrorKind::InputCancelled {
            return None;
        }
        let follow_up = result
            .remediation
            .map(|action| FollowUp::Remediate { action });
        match self.offer(Level::Error, &error.to_string(), follow_up)? {
            FollowUp::Remediate { action } => Some(action),
            FollowUp::OpenUrl { .. } => None,
        }
    }

    /// Report a failed command. Cancellation stays silent.
    pub fn error(&self, error: &ErrorKind) {
        if *error == ErrorKind::InputCancelled {
            return;
        }
        self.show(Level::Error, &error.to_string());
    }

    pub fn error_message(&self, message: &str) {
        self.show(Level::Error, message);
    }

    pub fn info(&self, message: &str) {
        self.show(Level::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.show(Level::Warning, message);
    }

    /// Show `message` with at most one follow-up; returns it if accepted.
    pub fn offer(&self, level: Level, message: &str, follow_up: Option<FollowUp>) -> Option<FollowUp> {
        let notification = Notification {
            level,
            message: message.to_string(),
            actions: follow_up.into_iter().collect(),
        };
        let chosen = self.host.notify(&notification)?;
        notification.actions.into_iter().nth(chosen)
    }

    /// Authentication feedback: who is signed in, or an offer to sign in.
    pub fn authentication(&self, user: Option<&GrcUser>, only_on_failure: bool) -> Option<RemediationAction> {
        match user {
            Some(user) => {
                if !only_on_failure {
                    self.info(&format!("Authenticated as {}.", user.username));
                }
                None
            }
            None if self.prefs.show_error_messages => {
                let follow_up = FollowUp::Remediate {
                    action: RemediationAction::Authenticate,
                };
                match self.offer(
                    Level::Error,
                    "Authentication failed, your access token is either not configured yet or it has changed/expired.",
                    Some(follow_up),
                )? {
                    FollowUp::Remediate { action } => Some(action),
                    FollowUp::OpenUrl { .. } => None,
                }
            }
            None => None,
        }
    }

    /// Update the status line, if the user wants one.
    pub fn status_line(&self, user: Option<&GrcUser>) {
        if !self.prefs.show_status_bar {
            return;
        }
        let text = match user {
            Some(u) if !u.username.is_empty() => format!("GRC: {}", u.username),
            Some(_) => "GRC: authenticated".to_string(),
            None => "GRC: not authenticated".to_string(),
        };
        self.host.status(&text);
    }

    fn show(&self, level: Level, message: &str) {
        self.host.notify(&Notification {
            level,
            message: message.to_string(),
            actions: Vec::new(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;
    use crate::testing::FakeHost;

    #[test]
    fn failed_gate_offers_single_remediation() {
        let host = FakeHost::accepting();
        let prefs = Preferences::default();
        let presenter = Presenter::new(&host, &prefs);

        let result = GateResult::fail(GateKind::Authentication, ErrorKind::NotAuthenticated, false);
        assert_eq!(presenter.gate(&result), Some(RemediationAction::Authenticate));

        let shown = host.notifications();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].level, Level::Error);
        assert_eq!(shown[0].actions.len(), 1);
        assert_eq!(shown[0].actions[0].label(), "Authenticate");
    }

    #[test]
    fn dismissed_notification_returns_none() {
        let host = FakeHost::default();
        let prefs = Preferences::default();
        let presenter = Presenter::new(&host, &prefs);
        let result = GateResult::fail(GateKind::Installation, ErrorKind::NotInstalled, false);
        assert_eq!(presenter.gate(&result), None);
        assert_eq!(host.notifications().len(), 1);
    }

    #[test]
    fn suppressed_and_passed_results_are_silent() {
        let host = FakeHost::accepting();
        let prefs = Preferences::default();
        let presenter = Presenter::new(&host, &prefs);

        let suppressed = GateResult::fail(GateKind::Installation, ErrorKind::NotInstalled, true);
        assert_eq!(presenter.gate(&suppressed), None);
        assert_eq!(presenter.gate(&GateResult::pass(false)), None);
        assert!(host.notifications().is_empty());
    }

    #[test]
    fn error_messages_can_be_turned_off() {
        let host = FakeHost::accepting();
        let prefs = Preferences {
            show_error_messages: false,
            ..Preferences::default()
        };
        let presenter = Presenter::new(&host, &prefs);
        let result = GateResult::fail(GateKind::Installation, ErrorKind::NotInstalled, false);
        assert_eq!(presenter.gate(&result), None);
        assert_eq!(presenter.authentication(None, false), None);
        assert!(host.notifications().is_empty());
    }

    #[test]
    fn unsupported_platform_has_no_button() {
        let host = FakeHost::accepting();
        let prefs = Preferences::default();
        let presenter = Presenter::new(&host, &prefs);
        let result = GateResult::fail(GateKind::Installation, ErrorKind::UnsupportedPlatform, false);
        assert_eq!(result.remediation, None);
        assert_eq!(presenter.gate(&result), None);
        assert!(host.notifications()[0].actions.is_empty());
    }

    #[test]
    fn cancellation_is_quiet() {
        let host = FakeHost::default();
        let prefs = Preferences::default();
        let presenter = Presenter::new(&host, &prefs);
        presenter.error(&ErrorKind::InputCancelled);
        assert!(host.notifications().is_empty());
        presenter.error(&ErrorKind::CommandFailed("boom".into()));
        assert_eq!(host.notifications().len(), 1);
    }

    #[test]
    fn offer_open_url() {
        let host = FakeHost::accepting();
        let prefs = Preferences::default();
        let presenter = Presenter::new(&host, &prefs);
        let url = "https://github.com/u/r".to_string();
        let chosen = presenter.offer(
            Level::Info,
            "Repository created.",
            Some(FollowUp::OpenUrl { url: url.clone() }),
        );
        assert_eq!(chosen, Some(FollowUp::OpenUrl { url }));
        assert_eq!(host.notifications()[0].actions[0].label(), "Open in Browser");
    }

    #[test]
    fn authenticated_user_greeting() {
        let host = FakeHost::default();
        let prefs = Preferences::default();
        let presenter = Presenter::new(&host, &prefs);
        let user = GrcUser {
            username: "octocat".into(),
            ..GrcUser::default()
        };
        presenter.authentication(Some(&user), false);
        presenter.authentication(Some(&user), true);
        let shown = host.notifications();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "Authenticated as octocat.");
    }

    #[test]
    fn status_line_respects_preference() {
        let host = FakeHost::default();
        let prefs = Preferences::default();
        Presenter::new(&host, &prefs).status_line(None);
        assert_eq!(host.status_lines.borrow().as_slice(), ["GRC: not authenticated"]);

        let host = FakeHost::default();
        let prefs = Preferences {
            show_status_bar: false,
            ..Preferences::default()
        };
        Presenter::new(&host, &prefs).status_line(None);
        assert!(host.status_lines.borrow().is_empty());
    }
}
