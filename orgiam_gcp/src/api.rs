//! The remote policy endpoints, as a trait so the resource can be handed
//! any client: the REST client in production, a fake in tests.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::policy::{Policy, SetIamPolicyRequest};

/// `getIamPolicy` / `setIamPolicy` on organizations.
///
/// Implementations must be safe to share between resource instances.
#[async_trait]
pub trait OrganizationsApi: Send + Sync {
    /// Fetch the policy of `resource` (e.g. `organizations/123`).
    async fn get_iam_policy(&self, resource: &str) -> Result<Policy, ApiError>;
    /// Replace the policy of `resource`. Returns the policy as stored.
    async fn set_iam_policy(
        &self,
        resource: &str,
        request: &SetIamPolicyRequest,
    ) -> Result<Policy, ApiError>;
}
