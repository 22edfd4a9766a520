use grc_core::gate::CREATE_REPOSITORY;
use grc_core::presenter::{FollowUp, Level, Presenter};
use grc_core::ErrorKind;

use crate::context::{halt_on, Ctx, Halted};

pub struct StartArgs {
    pub template: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// `grc-assist start-repository`: create a GitHub repository from a GRC
/// template and populate the working directory with it.
pub fn run(ctx: &mut Ctx, args: StartArgs) -> anyhow::Result<()> {
    ctx.require(CREATE_REPOSITORY)?;

    let presenter = Presenter::new(&ctx.host, &ctx.prefs);
    let host = presenter.host();
    let workdir = ctx.session.workdir().to_path_buf();
    let grc = ctx.session.client();

    let template = match args.template {
        Some(t) => t,
        None => {
            let templates = match grc.templates() {
                Ok(t) => t,
                Err(e) => return halt_on(&presenter, e),
            };
            if templates.is_empty() {
                presenter.info("You have no templates to use.");
                return Ok(());
            }
            match host.pick("Choose a template to use:", &templates) {
                Some(t) => t,
                None => return halt_on(&presenter, ErrorKind::InputCancelled),
            }
        }
    };

    let Some(name) = args
        .name
        .or_else(|| host.input("Enter a name for the repository:"))
    else {
        return halt_on(&presenter, ErrorKind::InputCancelled);
    };
    let Some(description) = args
        .description
        .or_else(|| host.input("Enter a description for the repository:"))
    else {
        return halt_on(&presenter, ErrorKind::InputCancelled);
    };

    if let Err(e) = grc.choose_template(&template, &name, &description, &workdir) {
        tracing::warn!("temp choose failed: {e}");
        presenter.error_message(&format!("Failed to create repository {name}."));
        return Err(Halted.into());
    }

    let Some(url) = grc.repo_url(&name) else {
        presenter.error_message("Failed to get the repository URL.");
        return Err(Halted.into());
    };

    let follow_up = presenter.offer(
        Level::Info,
        &format!("Repository created successfully. {url}"),
        Some(FollowUp::OpenUrl { url: url.clone() }),
    );
    if let Some(FollowUp::OpenUrl { url }) = follow_up {
        if let Err(e) = open::that(&url) {
            presenter.warn(&format!("Could not open a browser: {e}"));
        }
    }
    Ok(())
}
