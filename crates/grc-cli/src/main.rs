mod cmd;
mod context;
mod host;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, template::TemplateSubcommand};
use context::{Ctx, CtxOptions, Halted};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "grc-assist",
    about = "Drive the GRC CLI: install it, authenticate, and create GitHub repositories from templates",
    version,
    propagate_version = true
)]
struct Cli {
    /// Working directory for repository commands (default: current directory)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Preferences file (default: ~/.grc-assist/preferences.yaml)
    #[arg(long, global = true, env = "GRC_ASSIST_CONFIG")]
    config: Option<PathBuf>,

    /// GRC executable to use instead of searching PATH
    #[arg(long, global = true, env = "GRC_EXECUTABLE")]
    grc: Option<PathBuf>,

    /// Accept the offered follow-up action without asking
    #[arg(long, short = 'y', global = true, env = "GRC_ASSIST_YES")]
    yes: bool,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install GRC with the upstream install script
    Install,

    /// Store a GitHub access token in GRC
    Authenticate {
        /// Access token (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,
    },

    /// Update GRC to the latest release
    Update,

    /// Show the GRC executable, version, and signed-in user
    Status,

    /// Show the authenticated GitHub account
    Whoami,

    /// Create a GitHub repository from a template in the working directory
    StartRepository {
        /// Template to use (chosen from the list when omitted)
        #[arg(long)]
        template: Option<String>,
        /// Repository name
        #[arg(long)]
        name: Option<String>,
        /// Repository description
        #[arg(long)]
        description: Option<String>,
    },

    /// Give a GitHub user access to a remote repository
    AddCollaborator {
        /// Remote repository name
        #[arg(long)]
        repo: Option<String>,
        /// GitHub username to invite
        #[arg(long)]
        user: Option<String>,
        /// admin, push, or pull (anything else means admin)
        #[arg(long)]
        permission: Option<String>,
    },

    /// Manage GRC templates
    Template {
        #[command(subcommand)]
        subcommand: TemplateSubcommand,
    },

    /// Run the installation, version, and authentication checks
    Check,

    /// Inspect and initialize preferences
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

impl Commands {
    /// Commands that run behind gates and so get the startup pre-check.
    fn is_gated(&self) -> bool {
        matches!(
            self,
            Commands::Authenticate { .. }
                | Commands::Update
                | Commands::Whoami
                | Commands::StartRepository { .. }
                | Commands::AddCollaborator { .. }
                | Commands::Template { .. }
        )
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let workdir = root::resolve_workdir(cli.dir.as_deref());
    let result = Ctx::build(CtxOptions {
        workdir,
        config: cli.config,
        grc: cli.grc,
        assume_yes: cli.yes,
        json: cli.json,
    })
    .and_then(|mut ctx| dispatch(&mut ctx, cli.command));

    if let Err(e) = result {
        // Already reported to the user through a notification.
        if e.downcast_ref::<Halted>().is_some() {
            std::process::exit(1);
        }
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn dispatch(ctx: &mut Ctx, command: Commands) -> anyhow::Result<()> {
    if command.is_gated() {
        ctx.pre_check();
    }

    match command {
        Commands::Install => cmd::install::run(ctx),
        Commands::Authenticate { token } => cmd::authenticate::run(ctx, token),
        Commands::Update => cmd::update::run(ctx),
        Commands::Status => cmd::status::run(ctx),
        Commands::Whoami => cmd::status::whoami(ctx),
        Commands::StartRepository {
            template,
            name,
            description,
        } => cmd::repository::run(
            ctx,
            cmd::repository::StartArgs {
                template,
                name,
                description,
            },
        ),
        Commands::AddCollaborator {
            repo,
            user,
            permission,
        } => cmd::collaborator::run(
            ctx,
            cmd::collaborator::AddArgs {
                repo,
                collaborator: user,
                permission,
            },
        ),
        Commands::Template { subcommand } => cmd::template::run(ctx, subcommand),
        Commands::Check => cmd::status::check(ctx),
        Commands::Config { subcommand } => cmd::config::run(ctx, subcommand),
    }
}
