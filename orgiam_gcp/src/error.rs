use orgiam_core::LifecycleError;
use thiserror::Error;

/// Failures talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The remote reports the resource as absent (HTTP 404).
    #[error("{resource} not found")]
    NotFound {
        /// the resource that was asked for
        resource: String,
    },
    /// Any other non-success status.
    #[error("remote returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// response body, as sent
        body: String,
    },
    /// The request never got a response.
    #[error("couldn't send request: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body wasn't the expected JSON.
    #[error("couldn't decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures of the organization policy lifecycle verbs.
#[derive(Debug, Error)]
pub enum OrgPolicyError {
    /// `policy_data` isn't a JSON policy.
    #[error("could not unmarshal policy data {policy_data}:\n{source}")]
    InvalidPolicyData {
        /// the offending text
        policy_data: String,
        /// the parse error
        source: serde_json::Error,
    },
    /// The config can't be applied as given.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// The remote policy is absent.
    #[error("iam policy for {resource} not found")]
    NotFound {
        /// resource id
        resource: String,
    },
    /// A `getIamPolicy` call failed.
    #[error("error reading the organization policy for {resource} ({operation}): {source}")]
    RemoteReadError {
        /// the verb that issued the call
        operation: &'static str,
        /// resource id
        resource: String,
        /// the underlying failure
        source: ApiError,
    },
    /// A `setIamPolicy` call failed.
    #[error("error writing the organization policy for {resource} ({operation}): {source}")]
    RemoteWriteError {
        /// the verb that issued the call
        operation: &'static str,
        /// resource id
        resource: String,
        /// the underlying failure
        source: ApiError,
    },
    /// A destroy check found bindings left behind.
    #[error("organization policy for {resource} hasn't been deleted: {bindings} binding(s) remain")]
    NotDestroyed {
        /// resource id
        resource: String,
        /// how many bindings are still there
        bindings: usize,
    },
}

impl LifecycleError for OrgPolicyError {
    fn is_not_found(&self) -> bool {
        matches!(self, OrgPolicyError::NotFound { .. })
    }
}
