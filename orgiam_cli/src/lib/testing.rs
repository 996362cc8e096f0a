//! Shared helpers for command tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use orgiam_gcp::{
    policy::unmarshal_iam_policy, ApiError, OrganizationsApi, Policy, SetIamPolicyRequest,
};

/// Organizations whose policies are whatever the test says they are.
#[derive(Default)]
pub(crate) struct FakeRemote {
    policies: Mutex<HashMap<String, Policy>>,
    failing: Mutex<HashSet<String>>,
}

impl FakeRemote {
    /// Set the policy an organization currently holds.
    pub(crate) fn hold(self: &Arc<Self>, resource: &str, policy_data: &str) -> Arc<Self> {
        self.policies.lock().unwrap().insert(
            resource.to_owned(),
            unmarshal_iam_policy(policy_data).unwrap(),
        );
        Arc::clone(self)
    }

    /// Make every call for `resource` fail with a 500.
    pub(crate) fn fail(self: &Arc<Self>, resource: &str) -> Arc<Self> {
        self.failing.lock().unwrap().insert(resource.to_owned());
        Arc::clone(self)
    }

    fn check(&self, resource: &str) -> Result<(), ApiError> {
        if self.failing.lock().unwrap().contains(resource) {
            return Err(ApiError::Status {
                status: 500,
                body: "backend error".to_owned(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl OrganizationsApi for FakeRemote {
    async fn get_iam_policy(&self, resource: &str) -> Result<Policy, ApiError> {
        self.check(resource)?;
        self.policies
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: resource.to_owned(),
            })
    }

    async fn set_iam_policy(
        &self,
        resource: &str,
        request: &SetIamPolicyRequest,
    ) -> Result<Policy, ApiError> {
        self.check(resource)?;
        self.policies
            .lock()
            .unwrap()
            .insert(resource.to_owned(), request.policy.clone());
        Ok(request.policy.clone())
    }
}
