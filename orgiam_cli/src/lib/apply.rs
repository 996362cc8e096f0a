//! Apply the configuration, recording the resulting state

use anyhow::{Context, Result};
use colored::Colorize;

use orgiam_core::{lifecycle, log_runtime};

use crate::cmd::OrgIamArgs;
use crate::project::{desired_id, from_recorded, org_policy_resource, to_recorded, Project};

pub(super) async fn apply(args: &OrgIamArgs, project: &Project) -> Result<()> {
    let resource = org_policy_resource(args)?;
    let mut store = project.state_store()?;

    for config in project.desired()? {
        let id = desired_id(&config);
        let recorded = store
            .get(&id)
            .map(|r| from_recorded(&id, r))
            .transpose()?;
        // diff against the remote policy, not the last one we wrote down
        let prior = lifecycle::current(&resource, recorded.as_ref())
            .await
            .with_context(|| format!("reading {id}"))?;

        let state = log_runtime!(
            format!("apply {id}"),
            lifecycle::apply(&resource, prior.as_ref(), &config).await
        )
        .with_context(|| format!("applying {id}"))?;

        store.put(id.clone(), to_recorded(&state));
        // save as we go so a later failure doesn't lose earlier work
        store.save()?;
        println!("{}: {}", id, "applied".green());
    }
    Ok(())
}
