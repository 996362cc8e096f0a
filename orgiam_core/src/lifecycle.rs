//! Drive a resource through its lifecycle.
//!
//! This is the orchestrator side of the contract in [`crate::resource`]:
//! decide which verb a config change calls for, check the config against
//! the schema, and turn `NotFound` into "forget this resource".

use std::fmt::Display;

use anyhow::{bail, Result};

use crate::logging::{debug, info};
use crate::resource::{Fields, LifecycleError, Resource, ResourceId};
use crate::schema::ResourceSchema;

/// What applying a config would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Nothing recorded yet
    Create,
    /// Recorded, and these fields differ
    Update {
        /// changed field keys, in schema order
        fields: Vec<String>,
    },
    /// Recorded and equivalent
    NoOp,
}

impl Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Plan::Create => write!(f, "create"),
            Plan::Update { fields } => write!(f, "update ({})", fields.join(", ")),
            Plan::NoOp => write!(f, "no changes"),
        }
    }
}

/// Compare desired fields against recorded ones, honoring diff suppression.
pub fn plan(schema: &ResourceSchema, prior: Option<&Fields>, desired: &Fields) -> Plan {
    match prior {
        None => Plan::Create,
        Some(prior) => {
            let fields = schema.changed_fields(prior, desired);
            if fields.is_empty() {
                Plan::NoOp
            } else {
                Plan::Update { fields }
            }
        }
    }
}

/// Validate `config` and bring the resource to it: create when nothing is
/// recorded, update otherwise.
pub async fn apply<R: Resource>(
    resource: &R,
    prior: Option<&R::State>,
    config: &R::Config,
) -> Result<R::State> {
    let schema = R::schema();
    let report = schema.validate(&R::config_fields(config));
    for warning in &report.warnings {
        info!("{}: {}", schema.name, warning);
    }
    if !report.is_ok() {
        let errors = report
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("invalid {} config:\n{}", schema.name, errors);
    }

    let state = match prior {
        None => {
            debug!("creating {}", schema.name);
            resource.create(config).await?
        }
        Some(prior) => {
            debug!("updating {}", R::id(prior));
            resource.update(prior, config).await?
        }
    };
    Ok(state)
}

/// Read the resource. `None` means the remote side no longer has it and it
/// should be dropped from recorded state.
pub async fn refresh<R: Resource>(
    resource: &R,
    id: &ResourceId,
) -> Result<Option<R::State>, R::Error> {
    match resource.read(id).await {
        Ok(state) => Ok(Some(state)),
        Err(e) if e.is_not_found() => {
            info!("{} is gone; dropping it from state", id);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Re-read a recorded state so a diff runs against what the remote side
/// holds now, not what was last written down. `None` when nothing is
/// recorded or the remote side no longer has it.
pub async fn current<R: Resource>(
    resource: &R,
    recorded: Option<&R::State>,
) -> Result<Option<R::State>, R::Error> {
    match recorded {
        Some(state) => refresh(resource, &R::id(state)).await,
        None => Ok(None),
    }
}

/// Tear the resource down.
pub async fn destroy<R: Resource>(resource: &R, state: &R::State) -> Result<(), R::Error> {
    debug!("destroying {}", R::id(state));
    resource.delete(state).await
}
