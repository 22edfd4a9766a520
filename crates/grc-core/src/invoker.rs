//! Running GRC subcommands.
//!
//! The set of commands is closed ([`CommandTemplate`]). Arguments are passed
//! as argv, never through a shell, and every failure is folded into a
//! [`CommandOutcome`] instead of an error.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Every GRC subcommand this crate knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandTemplate {
    Authenticate,
    Version,
    Update,
    UserInfo,
    TemplateList,
    TemplateChoose,
    TemplateGenerate,
    TemplateMerge,
    TemplateEdit,
    RemoteUrl,
    RemoteAddCollaborator,
}

impl CommandTemplate {
    /// Leading argv words for this command.
    pub fn words(&self) -> &'static [&'static str] {
        match self {
            CommandTemplate::Authenticate => &["authenticate"],
            CommandTemplate::Version => &["version"],
            CommandTemplate::Update => &["update"],
            CommandTemplate::UserInfo => &["user"],
            CommandTemplate::TemplateList => &["temp", "list"],
            CommandTemplate::TemplateChoose => &["temp", "choose"],
            CommandTemplate::TemplateGenerate => &["temp", "generate"],
            CommandTemplate::TemplateMerge => &["temp", "merge"],
            CommandTemplate::TemplateEdit => &["temp", "edit"],
            CommandTemplate::RemoteUrl => &["remote", "url"],
            CommandTemplate::RemoteAddCollaborator => &["remote", "add-collab"],
        }
    }
}

/// One request to run a template with caller-supplied arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub template: CommandTemplate,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Hand the terminal to the child instead of capturing its output.
    pub interactive: bool,
}

impl Invocation {
    pub fn new(template: CommandTemplate) -> Self {
        Self {
            template,
            args: Vec::new(),
            cwd: None,
            interactive: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Human-readable command line, used for echoing and logs.
    pub fn display(&self, executable: &Path) -> String {
        let mut parts = vec![executable.display().to_string()];
        parts.extend(self.template.words().iter().map(|w| w.to_string()));
        parts.extend(self.args.iter().map(|a| {
            if a.contains(' ') || a.is_empty() {
                format!("\"{a}\"")
            } else {
                a.clone()
            }
        }));
        parts.join(" ")
    }
}

/// What came back from one GRC run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    pub succeeded: bool,
    pub stdout_lines: Vec<String>,
    pub error_info: Option<String>,
}

impl CommandOutcome {
    pub fn success(stdout: &str) -> Self {
        Self {
            succeeded: true,
            stdout_lines: split_lines(stdout),
            error_info: None,
        }
    }

    pub fn failure(info: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            stdout_lines: Vec::new(),
            error_info: Some(info.into()),
        }
    }

    /// Diagnostic text for a failed run, or a generic fallback.
    pub fn diagnostic(&self) -> String {
        self.error_info
            .clone()
            .unwrap_or_else(|| "unknown error".to_string())
    }

    /// True when any stdout line contains `needle`, ignoring ASCII case.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_ascii_uppercase();
        self.stdout_lines
            .iter()
            .any(|l| l.to_ascii_uppercase().contains(&needle))
    }
}

fn split_lines(stdout: &str) -> Vec<String> {
    stdout
        .trim()
        .lines()
        .map(|l| l.trim_end_matches('\r').to_string())
        .collect()
}

pub trait Invoker {
    fn run(&self, executable: &Path, invocation: &Invocation) -> CommandOutcome;
}

/// Spawns the real GRC binary.
#[derive(Debug, Clone, Default)]
pub struct ProcessInvoker {
    echo: bool,
}

impl ProcessInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print each command line to stderr before running it.
    pub fn echo_commands(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

impl Invoker for ProcessInvoker {
    fn run(&self, executable: &Path, invocation: &Invocation) -> CommandOutcome {
        let line = invocation.display(executable);
        if self.echo {
            eprintln!("> {line}");
        }
        tracing::debug!(command = %line, "running grc");

        let mut cmd = Command::new(executable);
        cmd.args(invocation.template.words());
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }

        if invocation.interactive {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
            return match cmd.status() {
                Ok(status) if status.success() => CommandOutcome::success(""),
                Ok(status) => {
                    tracing::warn!(command = %line, %status, "grc exited with failure");
                    CommandOutcome::failure(format!("grc exited with {status}"))
                }
                Err(e) => {
                    tracing::warn!(command = %line, "failed to spawn grc: {e}");
                    CommandOutcome::failure(format!("failed to spawn grc: {e}"))
                }
            };
        }

        cmd.stdin(Stdio::null());
        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(command = %line, "failed to spawn grc: {e}");
                return CommandOutcome::failure(format!("failed to spawn grc: {e}"));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if output.status.success() {
            return CommandOutcome::success(&stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let hint = if stderr.trim().is_empty() {
            format!("grc exited with {}", output.status)
        } else {
            stderr.trim().chars().take(500).collect()
        };
        tracing::warn!(command = %line, status = %output.status, "grc failed: {hint}");
        CommandOutcome {
            succeeded: false,
            stdout_lines: split_lines(&stdout),
            error_info: Some(hint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_words_are_stable() {
        assert_eq!(CommandTemplate::UserInfo.words(), &["user"]);
        assert_eq!(CommandTemplate::TemplateList.words(), &["temp", "list"]);
        assert_eq!(
            CommandTemplate::RemoteAddCollaborator.words(),
            &["remote", "add-collab"]
        );
    }

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let inv = Invocation::new(CommandTemplate::TemplateChoose)
            .arg("web.yaml")
            .args(["-n", "my repo"]);
        let line = inv.display(Path::new("/usr/bin/grc"));
        assert_eq!(line, "/usr/bin/grc temp choose web.yaml -n \"my repo\"");
    }

    #[test]
    fn success_splits_and_trims_output() {
        let out = CommandOutcome::success("\nline1\r\nline2\n\n");
        assert!(out.succeeded);
        assert_eq!(out.stdout_lines, vec!["line1", "line2"]);
    }

    #[test]
    fn mentions_is_case_insensitive() {
        let out = CommandOutcome::success("Error: Not Authenticated");
        assert!(out.mentions("NOT AUTHENTICATED"));
        assert!(!out.mentions("USERNAME"));
    }

    #[test]
    fn spawn_failure_becomes_outcome() {
        let out = ProcessInvoker::new().run(
            Path::new("/definitely/not/a/real/grc"),
            &Invocation::new(CommandTemplate::Version),
        );
        assert!(!out.succeeded);
        assert!(out.diagnostic().contains("failed to spawn grc"));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_captures_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let exe = dir.path().join("grc");
        std::fs::write(&exe, "#!/bin/sh\necho partial\necho 'bad token' >&2\nexit 3\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

        let out = ProcessInvoker::new().run(&exe, &Invocation::new(CommandTemplate::Authenticate));
        assert!(!out.succeeded);
        assert_eq!(out.error_info.as_deref(), Some("bad token"));
        assert_eq!(out.stdout_lines, vec!["partial"]);
    }

    #[cfg(unix)]
    #[test]
    fn arguments_reach_the_child_verbatim() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let exe = dir.path().join("grc");
        std::fs::write(&exe, "#!/bin/sh\nfor a in \"$@\"; do echo \"[$a]\"; done\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

        let out = ProcessInvoker::new().run(
            &exe,
            &Invocation::new(CommandTemplate::RemoteUrl).arg("my repo; rm -rf /"),
        );
        assert!(out.succeeded);
        assert_eq!(
            out.stdout_lines,
            vec!["[remote]", "[url]", "[my repo; rm -rf /]"]
        );
    }
}
