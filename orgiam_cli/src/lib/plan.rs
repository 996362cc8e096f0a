//! plan the changes for every configured organization policy

use anyhow::{Context, Result};
use colored::Colorize;

use orgiam_core::{
    lifecycle::{self, Plan},
    Resource,
};
use orgiam_gcp::{OrgPolicyResource, OrganizationsApi};

use crate::cmd::OrgIamArgs;
use crate::project::{desired_id, from_recorded, org_policy_resource, Project};

/// One line per resource: its id and what apply would do, judged against
/// the current remote policy.
pub(crate) async fn plan<C: OrganizationsApi>(
    resource: &OrgPolicyResource<C>,
    project: &Project,
) -> Result<Vec<(String, Plan)>> {
    let store = project.state_store()?;
    let schema = OrgPolicyResource::<C>::schema();

    let mut plans = vec![];
    for config in project.desired()? {
        let id = desired_id(&config);
        let recorded = store
            .get(&id)
            .map(|r| from_recorded(&id, r))
            .transpose()?;
        let prior = lifecycle::current(resource, recorded.as_ref())
            .await
            .with_context(|| format!("reading {id}"))?
            .map(|state| OrgPolicyResource::<C>::state_fields(&state));
        let desired = OrgPolicyResource::<C>::config_fields(&config);
        plans.push((id.to_string(), lifecycle::plan(&schema, prior.as_ref(), &desired)));
    }
    Ok(plans)
}

pub(super) async fn print_plan(args: &OrgIamArgs, project: &Project) -> Result<()> {
    let plans = plan(&org_policy_resource(args)?, project).await?;
    // Exit early if there haven't been any changes
    if plans.iter().all(|(_, p)| *p == Plan::NoOp) {
        println!("No changes found");
        return Ok(());
    }
    for (id, plan) in plans {
        let line = format!("{id}: {plan}");
        match plan {
            Plan::Create => println!("{}", line.green()),
            Plan::Update { .. } => println!("{}", line.yellow()),
            Plan::NoOp => println!("{line}"),
        }
    }
    Ok(())
}
