//! Loading a project: its config, its recorded state and its resources.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use orgiam_core::{
    config::ResourceConfig,
    fetch_credentials,
    logging::warn,
    project,
    state::{RecordedResource, StateStore},
    OrgIamConfig, Resource, ResourceId,
};
use orgiam_gcp::{
    org_resource_id, OrgPolicyConfig, OrgPolicyResource, OrgPolicyState,
    ResourceManagerRestClient, RESOURCE_TYPE,
};

use crate::cmd::OrgIamArgs;

/// A loaded orgiam project.
pub(crate) struct Project {
    root: PathBuf,
    config: OrgIamConfig,
}

impl Project {
    /// Read the project config. Relative paths in the config resolve
    /// against the directory holding it.
    pub(crate) fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config = OrgIamConfig::read_from_file(config_path).map_err(|e| {
            anyhow!(
                "unable to read {} - make sure you are in an orgiam project directory: {:#}",
                config_path.display(),
                e
            )
        })?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(Self { root, config })
    }

    /// The recorded state for this project.
    pub(crate) fn state_store(&self) -> Result<StateStore> {
        StateStore::load(self.root.join(&self.config.state_file))
    }

    /// The desired state of every configured organization policy, in
    /// config order.
    pub(crate) fn desired(&self) -> Result<Vec<OrgPolicyConfig>> {
        let mut desired = vec![];
        for resource in &self.config.resources {
            if resource.resource_type != RESOURCE_TYPE {
                warn!(
                    "skipping resource of unknown type {:?}",
                    resource.resource_type
                );
                continue;
            }
            desired.push(self.org_policy_config(resource)?);
        }
        Ok(desired)
    }

    fn org_policy_config(&self, resource: &ResourceConfig) -> Result<OrgPolicyConfig> {
        let org_id = resource.get("org_id")?.to_owned();
        let policy_data = match (
            resource.config.get("policy_data"),
            resource.config.get("policy_file"),
        ) {
            (Some(data), None) => data.to_owned(),
            (None, Some(file)) => read_policy_file(self.root.join(file))?,
            (Some(_), Some(_)) => bail!(
                "organization {}: set either `policy_data` or `policy_file`, not both",
                org_id
            ),
            (None, None) => bail!(
                "organization {}: one of `policy_data` or `policy_file` is required",
                org_id
            ),
        };
        Ok(OrgPolicyConfig::new(org_id, policy_data))
    }
}

/// Read a JSON policy file.
pub(crate) fn read_policy_file<P: AsRef<Path>>(path: P) -> Result<String> {
    fs::read_to_string(path.as_ref())
        .with_context(|| format!("reading policy file {}", path.as_ref().display()))
}

/// Build the resource handler from the selected credentials profile.
pub(crate) fn org_policy_resource(
    args: &OrgIamArgs,
) -> Result<OrgPolicyResource<ResourceManagerRestClient>> {
    let path = match &args.credentials {
        Some(p) => p.to_owned(),
        None => project::credentials_cfg_path()?,
    };
    let creds = fetch_credentials(path)?;
    let profile = creds
        .get(&args.profile)
        .ok_or_else(|| anyhow!("no credentials profile named {:?}", args.profile))?;
    OrgPolicyResource::from_credentials(profile)
}

/// Identity of a desired config.
pub(crate) fn desired_id(config: &OrgPolicyConfig) -> ResourceId {
    org_resource_id(&config.org_id)
}

/// State in the form the store keeps it.
pub(crate) fn to_recorded(state: &OrgPolicyState) -> RecordedResource {
    RecordedResource {
        resource_type: RESOURCE_TYPE.to_owned(),
        fields: OrgPolicyResource::<ResourceManagerRestClient>::state_fields(state),
    }
}

/// State back out of the store.
pub(crate) fn from_recorded(id: &ResourceId, recorded: &RecordedResource) -> Result<OrgPolicyState> {
    if recorded.resource_type != RESOURCE_TYPE {
        bail!(
            "{} is recorded as {:?}, not {}",
            id,
            recorded.resource_type,
            RESOURCE_TYPE
        );
    }
    let field = |key: &str| {
        recorded
            .fields
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("recorded state for {} is missing `{}`", id, key))
    };
    Ok(OrgPolicyState {
        id: id.clone(),
        org_id: field("org_id")?,
        policy_data: field("policy_data")?,
    })
}
