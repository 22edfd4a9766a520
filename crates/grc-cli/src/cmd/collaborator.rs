use grc_core::client::Permission;
use grc_core::gate::AUTHENTICATED;
use grc_core::presenter::Presenter;
use grc_core::ErrorKind;

use crate::context::{halt_on, Ctx, Halted};

pub struct AddArgs {
    pub repo: Option<String>,
    pub collaborator: Option<String>,
    pub permission: Option<String>,
}

/// `grc-assist add-collaborator`: invite a GitHub user to a remote repository.
pub fn run(ctx: &mut Ctx, args: AddArgs) -> anyhow::Result<()> {
    ctx.require(AUTHENTICATED)?;

    let presenter = Presenter::new(&ctx.host, &ctx.prefs);
    let host = presenter.host();

    let Some(repo) = args
        .repo
        .or_else(|| host.input("Enter the name of the remote repository:"))
    else {
        return halt_on(&presenter, ErrorKind::InputCancelled);
    };
    let Some(collaborator) = args
        .collaborator
        .or_else(|| host.input("Enter the name of the collaborator:"))
    else {
        return halt_on(&presenter, ErrorKind::InputCancelled);
    };
    let permission = match args.permission {
        Some(p) => p,
        None => {
            let choices: Vec<String> = Permission::ALL.iter().map(|p| p.to_string()).collect();
            let prompt = format!("Choose the permission to give to {collaborator}:");
            match host.pick(&prompt, &choices) {
                Some(p) => p,
                None => return halt_on(&presenter, ErrorKind::InputCancelled),
            }
        }
    };

    match ctx
        .session
        .client()
        .add_collaborator(&repo, &collaborator, &permission)
    {
        Ok(granted) => {
            presenter.info(&format!(
                "Collaborator {collaborator} added to {repo} with {granted} permission."
            ));
            Ok(())
        }
        Err(e) => {
            tracing::warn!("add-collab failed: {e}");
            presenter.error_message(&format!("Failed to add {collaborator} to {repo}."));
            Err(Halted.into())
        }
    }
}
