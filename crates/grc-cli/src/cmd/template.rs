use clap::Subcommand;
use grc_core::gate::TOOL_READY;
use grc_core::presenter::Presenter;
use grc_core::ErrorKind;

use crate::context::{halt_on, Ctx, Halted};
use crate::output::print_json;

#[derive(Subcommand)]
pub enum TemplateSubcommand {
    /// List the templates GRC knows about
    List,

    /// Generate a new template interactively
    Create,

    /// Merge several templates into one
    Merge {
        /// Templates to merge (prompted for when omitted)
        templates: Vec<String>,
        /// Output file name
        #[arg(long, short = 'o')]
        output: Option<String>,
    },

    /// Open a template in GRC's editor
    Edit {
        /// Template to edit (chosen from the list when omitted)
        name: Option<String>,
    },
}

pub fn run(ctx: &mut Ctx, subcmd: TemplateSubcommand) -> anyhow::Result<()> {
    ctx.require(TOOL_READY)?;
    match subcmd {
        TemplateSubcommand::List => list(ctx),
        TemplateSubcommand::Create => create(ctx),
        TemplateSubcommand::Merge { templates, output } => merge(ctx, templates, output),
        TemplateSubcommand::Edit { name } => edit(ctx, name),
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(ctx: &mut Ctx) -> anyhow::Result<()> {
    let presenter = Presenter::new(&ctx.host, &ctx.prefs);
    let templates = match ctx.session.client().templates() {
        Ok(t) => t,
        Err(e) => return halt_on(&presenter, e),
    };

    if ctx.json {
        return print_json(&serde_json::json!({ "templates": templates }));
    }
    if templates.is_empty() {
        println!("No templates found.");
        return Ok(());
    }
    for t in &templates {
        println!("{t}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// create / edit
// ---------------------------------------------------------------------------

fn create(ctx: &mut Ctx) -> anyhow::Result<()> {
    let presenter = Presenter::new(&ctx.host, &ctx.prefs);
    match ctx.session.client().generate_template() {
        Ok(()) => Ok(()),
        Err(e) => halt_on(&presenter, e),
    }
}

fn edit(ctx: &mut Ctx, name: Option<String>) -> anyhow::Result<()> {
    let presenter = Presenter::new(&ctx.host, &ctx.prefs);
    let grc = ctx.session.client();

    let name = match name {
        Some(n) => n,
        None => {
            let templates = match grc.templates() {
                Ok(t) => t,
                Err(e) => return halt_on(&presenter, e),
            };
            if templates.is_empty() {
                presenter.info("You have no templates to edit.");
                return Ok(());
            }
            match presenter.host().pick("Choose a template to edit:", &templates) {
                Some(n) => n,
                None => return halt_on(&presenter, ErrorKind::InputCancelled),
            }
        }
    };

    match grc.edit_template(&name) {
        Ok(()) => Ok(()),
        Err(e) => halt_on(&presenter, e),
    }
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

fn merge(ctx: &mut Ctx, templates: Vec<String>, output: Option<String>) -> anyhow::Result<()> {
    let presenter = Presenter::new(&ctx.host, &ctx.prefs);
    let host = presenter.host();

    let templates = if templates.is_empty() {
        match host.input("Enter the templates to merge, separated by spaces:") {
            Some(line) => line.split_whitespace().map(str::to_string).collect(),
            None => return halt_on(&presenter, ErrorKind::InputCancelled),
        }
    } else {
        templates
    };
    if templates.len() < 2 {
        presenter.error_message("Choose at least two templates to merge.");
        return Err(Halted.into());
    }

    let Some(output) = output.or_else(|| host.input("Enter a name for the merged template:"))
    else {
        return halt_on(&presenter, ErrorKind::InputCancelled);
    };

    match ctx.session.client().merge_templates(&templates, &output) {
        Ok(()) => {
            presenter.info(&format!("Templates merged into {output}."));
            Ok(())
        }
        Err(e) => {
            tracing::warn!("temp merge failed: {e}");
            presenter.error_message("Failed to merge templates.");
            Err(Halted.into())
        }
    }
}
