//! Rest API interface for Cloud Resource Manager
//!

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use orgiam_core::logging::debug;
use reqwest::RequestBuilder;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    api::OrganizationsApi,
    consts,
    creds::GcpCredentials,
    error::ApiError,
    policy::{Policy, SetIamPolicyRequest},
};

/// Wrapper struct for http functionality
pub struct ResourceManagerRestClient {
    /// The credentials used to authenticate into Cloud Resource Manager.
    credentials: GcpCredentials,
    http_client: reqwest::Client,
}

impl ResourceManagerRestClient {
    pub(crate) fn new(credentials: GcpCredentials) -> Result<Self> {
        credentials.validate()?;
        Ok(Self {
            credentials,
            http_client: reqwest::Client::new(),
        })
    }

    /// `{base}/{resource}:{method}`, e.g.
    /// `https://cloudresourcemanager.googleapis.com/v1/organizations/123:getIamPolicy`
    fn get_url(&self, resource: &str, method: &str) -> String {
        format!("{}/{}:{}", self.credentials.base_url(), resource, method)
    }

    fn get_request(&self, url: String) -> RequestBuilder {
        self.http_client
            .post(url)
            .header(
                consts::AUTH_HEADER,
                format!["Bearer {}", self.credentials.access_token],
            )
            .header(consts::CONTENT_TYPE_HEADER, "application/json")
            .header(consts::ACCEPT_HEADER, "application/json")
            .header(consts::USER_AGENT_HEADER, consts::USER_AGENT)
    }

    /// POST `body` to `resource:method` and decode the JSON response.
    async fn call<B, T>(&self, resource: &str, method: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.get_url(resource, method);
        debug!("POST {}", url);
        let response = self.get_request(url).json(body).send().await?;

        let status = response.status();
        debug!("status for {} {}: {}", method, resource, status);
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                resource: resource.to_owned(),
            });
        }
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl OrganizationsApi for ResourceManagerRestClient {
    async fn get_iam_policy(&self, resource: &str) -> Result<Policy, ApiError> {
        // GetIamPolicyRequest has no required fields
        let body: HashMap<&str, &str> = HashMap::new();
        self.call(resource, "getIamPolicy", &body).await
    }

    async fn set_iam_policy(
        &self,
        resource: &str,
        request: &SetIamPolicyRequest,
    ) -> Result<Policy, ApiError> {
        self.call(resource, "setIamPolicy", request).await
    }
}
