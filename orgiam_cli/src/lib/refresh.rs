//! Refresh recorded state from the remote side

use anyhow::{Context, Result};
use colored::Colorize;

use orgiam_core::{lifecycle, state::StateStore};
use orgiam_gcp::{OrgPolicyResource, OrganizationsApi};

use crate::cmd::OrgIamArgs;
use crate::project::{org_policy_resource, to_recorded, Project};

pub(super) async fn refresh(args: &OrgIamArgs, project: &Project) -> Result<()> {
    let resource = org_policy_resource(args)?;
    let mut store = project.state_store()?;
    refresh_store(&resource, &mut store).await
}

/// Re-read every recorded policy, saving after each one.
async fn refresh_store<C: OrganizationsApi>(
    resource: &OrgPolicyResource<C>,
    store: &mut StateStore,
) -> Result<()> {
    let ids: Vec<_> = store.iter().map(|(id, _)| id.clone()).collect();

    for id in ids {
        match lifecycle::refresh(resource, &id)
            .await
            .with_context(|| format!("refreshing {id}"))?
        {
            Some(state) => {
                store.put(id.clone(), to_recorded(&state));
                println!("{}: {}", id, "refreshed".green());
            }
            None => {
                store.remove(&id);
                println!("{}: {}", id, "gone, removed from state".yellow());
            }
        }
        store.save()?;
    }
    Ok(())
}
