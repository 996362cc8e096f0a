//! The `google_organization_iam_policy` resource.
//!
//! Binds a JSON policy document (bindings only) to an organization. The
//! organization itself always exists remotely, so "delete" resets the
//! bindings to an empty set instead of removing anything, and a read after
//! delete still succeeds.

use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use serde::{Deserialize, Serialize};

use orgiam_core::{
    logging::{debug, info},
    resource::Fields,
    FieldSchema, Resource, ResourceId, ResourceSchema,
};

use crate::{
    api::OrganizationsApi,
    consts,
    error::{ApiError, OrgPolicyError},
    policy::{
        marshal_iam_policy, policy_data_equivalent, unmarshal_iam_policy, validate_iam_policy,
        Policy, SetIamPolicyRequest,
    },
};

const ORG_ID: &str = "org_id";
const POLICY_DATA: &str = "policy_data";

/// Desired state, as authored by the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct OrgPolicyConfig {
    /// The organization's numeric id, e.g. `123`
    pub org_id: String,
    /// JSON policy document
    pub policy_data: String,
}

/// Recorded state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgPolicyState {
    /// `organizations/<org_id>`
    pub id: ResourceId,
    /// The organization's numeric id
    pub org_id: String,
    /// Bindings as last read, in `policy_data` form
    pub policy_data: String,
}

/// The resource identity for an organization.
pub fn org_resource_id(org_id: &str) -> ResourceId {
    ResourceId(format!("{}{}", consts::ORGANIZATIONS_PREFIX, org_id))
}

/// Manages the IAM policy of one organization per config.
pub struct OrgPolicyResource<C> {
    client: Arc<C>,
}

impl<C> Clone for OrgPolicyResource<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: OrganizationsApi> OrgPolicyResource<C> {
    /// Build a resource around a shared client.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Parse `policy_data` and write it to `organizations/{org_id}`.
    async fn set_policy(
        &self,
        operation: &'static str,
        config: &OrgPolicyConfig,
    ) -> Result<ResourceId, OrgPolicyError> {
        let id = org_resource_id(&config.org_id);
        let policy = unmarshal_iam_policy(&config.policy_data)?;
        debug!(
            "setting {} binding(s) on {} ({})",
            policy.bindings.len(),
            id,
            operation
        );
        self.client
            .set_iam_policy(&id.0, &SetIamPolicyRequest::new(policy, None))
            .await
            .map_err(|source| OrgPolicyError::RemoteWriteError {
                operation,
                resource: id.0.clone(),
                source,
            })?;
        Ok(id)
    }

    /// Clear every binding on the organization's policy. The organization
    /// is left in place.
    pub async fn reset_bindings(&self, id: &ResourceId) -> Result<(), OrgPolicyError> {
        let request = SetIamPolicyRequest::new(
            Policy::default(),
            Some(consts::BINDINGS_UPDATE_MASK.to_owned()),
        );
        self.client
            .set_iam_policy(&id.0, &request)
            .await
            .map_err(|source| OrgPolicyError::RemoteWriteError {
                operation: "delete",
                resource: id.0.clone(),
                source,
            })?;
        info!("cleared iam policy bindings for {}", id);
        Ok(())
    }

    /// Check that a delete took effect: the policy must have no bindings
    /// left. A policy that is gone entirely also counts.
    pub async fn verify_destroyed(&self, id: &ResourceId) -> Result<(), OrgPolicyError> {
        match self.client.get_iam_policy(&id.0).await {
            Ok(policy) if !policy.bindings.is_empty() => Err(OrgPolicyError::NotDestroyed {
                resource: id.0.clone(),
                bindings: policy.bindings.len(),
            }),
            Ok(_) | Err(ApiError::NotFound { .. }) => Ok(()),
            Err(source) => Err(OrgPolicyError::RemoteReadError {
                operation: "verify_destroyed",
                resource: id.0.clone(),
                source,
            }),
        }
    }
}

fn require_org_id(config: &OrgPolicyConfig) -> Result<(), OrgPolicyError> {
    if config.org_id.is_empty() {
        return Err(OrgPolicyError::InvalidConfig(
            "`org_id` must not be empty".to_owned(),
        ));
    }
    Ok(())
}

#[async_trait]
impl<C: OrganizationsApi> Resource for OrgPolicyResource<C> {
    type Config = OrgPolicyConfig;
    type State = OrgPolicyState;
    type Error = OrgPolicyError;

    fn schema() -> ResourceSchema {
        ResourceSchema::new(
            consts::RESOURCE_TYPE,
            vec![
                FieldSchema::required_string(ORG_ID),
                FieldSchema::required_string(POLICY_DATA)
                    .with_validate(validate_iam_policy)
                    .with_diff_suppress(policy_data_equivalent),
            ],
        )
    }

    fn id(state: &OrgPolicyState) -> ResourceId {
        state.id.clone()
    }

    fn config_fields(config: &OrgPolicyConfig) -> Fields {
        Fields::from([
            (ORG_ID.to_owned(), config.org_id.clone()),
            (POLICY_DATA.to_owned(), config.policy_data.clone()),
        ])
    }

    fn state_fields(state: &OrgPolicyState) -> Fields {
        Fields::from([
            (ORG_ID.to_owned(), state.org_id.clone()),
            (POLICY_DATA.to_owned(), state.policy_data.clone()),
        ])
    }

    async fn create(&self, config: &OrgPolicyConfig) -> Result<OrgPolicyState, OrgPolicyError> {
        require_org_id(config)?;
        let id = self.set_policy("create", config).await?;
        info!("attached iam policy to {}", id);
        self.read(&id).await
    }

    async fn read(&self, id: &ResourceId) -> Result<OrgPolicyState, OrgPolicyError> {
        let policy = self
            .client
            .get_iam_policy(&id.0)
            .await
            .map_err(|source| match source {
                ApiError::NotFound { .. } => OrgPolicyError::NotFound {
                    resource: id.0.clone(),
                },
                source => OrgPolicyError::RemoteReadError {
                    operation: "read",
                    resource: id.0.clone(),
                    source,
                },
            })?;
        debug!("read {} binding(s) for {}", policy.bindings.len(), id);

        let org_id = id
            .0
            .strip_prefix(consts::ORGANIZATIONS_PREFIX)
            .unwrap_or(&id.0)
            .to_owned();
        Ok(OrgPolicyState {
            id: id.clone(),
            org_id,
            policy_data: marshal_iam_policy(&policy),
        })
    }

    async fn update(
        &self,
        prior: &OrgPolicyState,
        config: &OrgPolicyConfig,
    ) -> Result<OrgPolicyState, OrgPolicyError> {
        require_org_id(config)?;
        if prior.org_id != config.org_id {
            return Err(OrgPolicyError::InvalidConfig(format!(
                "`org_id` can't change in place ({} -> {}); destroy and recreate instead",
                prior.org_id, config.org_id
            )));
        }
        // Surface bad input even when nothing else would have triggered a write.
        unmarshal_iam_policy(&config.policy_data)?;

        if Self::schema().has_change(
            POLICY_DATA,
            Some(prior.policy_data.as_str()),
            Some(config.policy_data.as_str()),
        ) {
            self.set_policy("update", config).await?;
            info!("updated iam policy for {}", prior.id);
        } else {
            debug!("policy for {} is unchanged", prior.id);
        }
        self.read(&prior.id).await
    }

    async fn delete(&self, state: &OrgPolicyState) -> Result<(), OrgPolicyError> {
        self.reset_bindings(&state.id).await
    }
}
