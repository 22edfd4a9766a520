use crate::context::Ctx;
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use grc_core::config::{Preferences, WarnLevel};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the preferences in effect and where they were read from
    Show,

    /// Validate the preferences for common mistakes
    Validate,

    /// Write a preferences file with the default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(ctx: &Ctx, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Validate => validate(ctx),
        ConfigSubcommand::Init { force } => init(ctx, force),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(ctx: &Ctx) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(&serde_json::json!({
            "path": ctx.prefs_path,
            "preferences": ctx.prefs,
        }));
    }

    match &ctx.prefs_path {
        Some(path) if path.exists() => println!("# {}", path.display()),
        Some(path) => println!("# {} (not found, defaults)", path.display()),
        None => println!("# defaults"),
    }
    print!("{}", serde_yaml::to_string(&ctx.prefs)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(ctx: &Ctx) -> anyhow::Result<()> {
    let warnings = ctx.prefs.validate();

    if ctx.json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Preferences are valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("preferences validation found errors");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(ctx: &Ctx, force: bool) -> anyhow::Result<()> {
    let path = ctx
        .prefs_path
        .as_deref()
        .context("no preferences path: home directory not found, pass --config")?;

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Preferences::default()
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    if ctx.json {
        print_json(&serde_json::json!({ "path": path }))?;
    } else {
        println!("Wrote default preferences to {}", path.display());
    }
    Ok(())
}
