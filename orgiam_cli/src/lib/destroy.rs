//! Clear every recorded policy and forget it

use anyhow::{Context, Result};
use colored::Colorize;

use orgiam_core::lifecycle;

use crate::cmd::OrgIamArgs;
use crate::project::{from_recorded, org_policy_resource, Project};

pub(super) async fn destroy(args: &OrgIamArgs, project: &Project) -> Result<()> {
    let resource = org_policy_resource(args)?;
    let mut store = project.state_store()?;
    let recorded: Vec<_> = store
        .iter()
        .map(|(id, r)| from_recorded(id, r))
        .collect::<Result<_>>()?;

    for state in recorded {
        lifecycle::destroy(&resource, &state)
            .await
            .with_context(|| format!("destroying {}", state.id))?;
        // the organization outlives us; make sure the bindings really went away
        resource.verify_destroyed(&state.id).await?;
        store.remove(&state.id);
        store.save()?;
        println!("{}: {}", state.id, "bindings cleared".green());
    }
    Ok(())
}
