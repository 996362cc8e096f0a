//! Google Cloud organization IAM policy
//!
//! Everything needed to manage the IAM policy of a Google Cloud
//! organization through Cloud Resource Manager.
//!
//! ```no_run
//! use orgiam_core::config::CredentialsMap;
//! use orgiam_gcp::OrgPolicyResource;
//!
//! let credentials = CredentialsMap::from([("access_token".to_owned(), "ya29...".to_owned())]);
//! let resource = OrgPolicyResource::from_credentials(&credentials).unwrap();
//! ```
#![deny(missing_docs)]

mod api;
mod consts;
mod creds;
mod error;
mod org_policy;
pub mod policy;
mod rest;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use orgiam_core::config::CredentialsMap;

pub use api::OrganizationsApi;
pub use consts::RESOURCE_TYPE;
pub use error::{ApiError, OrgPolicyError};
pub use org_policy::{org_resource_id, OrgPolicyConfig, OrgPolicyResource, OrgPolicyState};
pub use policy::{Binding, Policy, SetIamPolicyRequest};
pub use rest::ResourceManagerRestClient;

impl OrgPolicyResource<ResourceManagerRestClient> {
    /// Validates the credentials and builds a resource backed by the
    /// Cloud Resource Manager REST API.
    ///
    /// Validates that the required fields are present to authenticate.
    /// Stashes the credentials in the client for use when connecting.
    pub fn from_credentials(credentials: &CredentialsMap) -> Result<Self> {
        let mut creds = creds::GcpCredentials::default();
        let mut required_fields: HashSet<_> = vec![
            "access_token",
            // "url" // not required – defaults to the public endpoint.
        ]
        .into_iter()
        .collect();

        for (k, v) in credentials.iter() {
            match k.as_ref() {
                "access_token" => creds.access_token = v.to_string(),
                "url" => creds.url = Some(v.to_string()),
                _ => (),
            }

            required_fields.remove::<str>(k);
        }

        if !required_fields.is_empty() {
            Err(anyhow![
                "GCP credentials missing required fields: {:#?}",
                required_fields
            ])
        } else {
            let client = ResourceManagerRestClient::new(creds)?;
            Ok(OrgPolicyResource::new(Arc::new(client)))
        }
    }
}
