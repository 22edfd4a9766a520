//! Typed operations over the GRC command surface.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::gate::GateKind;
use crate::invoker::{CommandOutcome, CommandTemplate, Invocation, Invoker};
use crate::parse::{self, GrcUser};
use crate::probe::{ExecutableLocation, Probe};

pub type Outcome<T> = std::result::Result<T, ErrorKind>;

// ---------------------------------------------------------------------------
// Permission
// ---------------------------------------------------------------------------

/// Access level granted to a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    Admin,
    Push,
    Pull,
}

impl Permission {
    pub const ALL: [Permission; 3] = [Permission::Admin, Permission::Push, Permission::Pull];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Admin => "admin",
            Permission::Push => "push",
            Permission::Pull => "pull",
        }
    }

    /// Anything empty or unrecognized becomes `Admin`.
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Permission::Admin),
            "push" => Ok(Permission::Push),
            "pull" => Ok(Permission::Pull),
            other => Err(format!("unknown permission '{other}'")),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GrcClient
// ---------------------------------------------------------------------------

/// Runs GRC commands against the located executable.
///
/// The executable location and the authenticated user are cached until
/// [`GrcClient::forget`] drops them.
pub struct GrcClient {
    probe: Box<dyn Probe>,
    invoker: Box<dyn Invoker>,
    location: Option<ExecutableLocation>,
    user: Option<GrcUser>,
}

impl GrcClient {
    pub fn new(probe: Box<dyn Probe>, invoker: Box<dyn Invoker>) -> Self {
        Self {
            probe,
            invoker,
            location: None,
            user: None,
        }
    }

    /// Where GRC lives, probing on first use.
    pub fn location(&mut self) -> &ExecutableLocation {
        self.location.get_or_insert_with(|| self.probe.locate())
    }

    /// Drop whatever is cached behind `gate` so it is fetched again.
    pub fn forget(&mut self, gate: GateKind) {
        match gate {
            GateKind::Installation => {
                self.location = None;
                self.user = None;
            }
            GateKind::Authentication => self.user = None,
            GateKind::Version | GateKind::NotARepository => {}
        }
    }

    fn run(&mut self, invocation: Invocation) -> CommandOutcome {
        let location = self.location();
        let Some(exe) = location.path().map(Path::to_path_buf) else {
            let error = location.error().cloned().unwrap_or(ErrorKind::NotInstalled);
            return CommandOutcome::failure(error.to_string());
        };
        self.invoker.run(&exe, &invocation)
    }

    fn run_checked(&mut self, invocation: Invocation) -> Outcome<CommandOutcome> {
        let out = self.run(invocation);
        if out.succeeded {
            Ok(out)
        } else {
            Err(ErrorKind::CommandFailed(out.diagnostic()))
        }
    }

    // -- authentication ----------------------------------------------------

    pub fn authenticate(&mut self, token: &str) -> Outcome<()> {
        require_non_empty("access token", token)?;
        let out = self.run_checked(Invocation::new(CommandTemplate::Authenticate).arg(token))?;
        self.user = None;
        if out.mentions("ERROR") {
            return Err(ErrorKind::CommandFailed(out.stdout_lines.join("\n")));
        }
        Ok(())
    }

    pub fn is_authenticated(&mut self) -> bool {
        self.user().is_some()
    }

    /// The authenticated account, or `None` when GRC has no valid token.
    pub fn user(&mut self) -> Option<GrcUser> {
        if let Some(user) = &self.user {
            return Some(user.clone());
        }
        let out = self.run(Invocation::new(CommandTemplate::UserInfo));
        if !out.succeeded || out.mentions("NOT AUTHENTICATED") {
            tracing::debug!("grc reports no authenticated user");
            return None;
        }
        let user = parse::user(&out.stdout_lines);
        self.user = Some(user.clone());
        Some(user)
    }

    // -- version -----------------------------------------------------------

    pub fn version(&mut self) -> Option<String> {
        let out = self.run(Invocation::new(CommandTemplate::Version));
        if !out.succeeded {
            return None;
        }
        parse::version(&out.stdout_lines)
    }

    pub fn update(&mut self) -> Outcome<()> {
        self.run_checked(Invocation::new(CommandTemplate::Update).interactive())
            .map(|_| ())
    }

    // -- templates ---------------------------------------------------------

    pub fn templates(&mut self) -> Outcome<Vec<String>> {
        let out = self.run_checked(Invocation::new(CommandTemplate::TemplateList))?;
        Ok(parse::templates(&out.stdout_lines))
    }

    /// Create a repository from `template` inside `cwd`.
    pub fn choose_template(
        &mut self,
        template: &str,
        repo_name: &str,
        description: &str,
        cwd: &Path,
    ) -> Outcome<()> {
        require_non_empty("template name", template)?;
        require_non_empty("repository name", repo_name)?;
        let invocation = Invocation::new(CommandTemplate::TemplateChoose)
            .arg(template)
            .args(["-n", repo_name, "-d", description, "--include_content", "true"])
            .cwd(cwd);
        self.run_checked(invocation).map(|_| ())
    }

    /// Hand the terminal to GRC's interactive template generator.
    pub fn generate_template(&mut self) -> Outcome<()> {
        self.run_checked(Invocation::new(CommandTemplate::TemplateGenerate).interactive())
            .map(|_| ())
    }

    pub fn edit_template(&mut self, template: &str) -> Outcome<()> {
        require_non_empty("template name", template)?;
        self.run_checked(
            Invocation::new(CommandTemplate::TemplateEdit)
                .arg(template)
                .interactive(),
        )
        .map(|_| ())
    }

    pub fn merge_templates(&mut self, templates: &[String], output: &str) -> Outcome<()> {
        if templates.is_empty() {
            return Err(ErrorKind::CommandFailed(
                "at least one template is required".to_string(),
            ));
        }
        for name in templates {
            require_non_empty("template name", name)?;
        }
        require_non_empty("output file name", output)?;
        let invocation = Invocation::new(CommandTemplate::TemplateMerge)
            .args(templates.iter().cloned())
            .args(["-o", output, "--ignore_conflicts"]);
        self.run_checked(invocation).map(|_| ())
    }

    // -- remote ------------------------------------------------------------

    pub fn repo_url(&mut self, repo_name: &str) -> Option<String> {
        if repo_name.trim().is_empty() {
            return None;
        }
        let out = self.run(Invocation::new(CommandTemplate::RemoteUrl).arg(repo_name));
        if !out.succeeded {
            return None;
        }
        parse::repo_url(&out.stdout_lines)
    }

    /// Returns the permission actually granted after normalization.
    pub fn add_collaborator(
        &mut self,
        repo_name: &str,
        collaborator: &str,
        permission: &str,
    ) -> Outcome<Permission> {
        require_non_empty("repository name", repo_name)?;
        require_non_empty("collaborator", collaborator)?;
        let permission = Permission::normalize(permission);
        let invocation = Invocation::new(CommandTemplate::RemoteAddCollaborator).args([
            repo_name,
            collaborator,
            permission.as_str(),
        ]);
        self.run_checked(invocation)?;
        Ok(permission)
    }

    /// Path of the located executable, if any.
    pub fn executable(&mut self) -> Option<PathBuf> {
        self.location().path().map(Path::to_path_buf)
    }
}

fn require_non_empty(what: &str, value: &str) -> Outcome<()> {
    if value.trim().is_empty() {
        return Err(ErrorKind::CommandFailed(format!("{what} must not be empty")));
    }
    Ok(())
}
