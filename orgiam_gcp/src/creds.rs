use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::consts;

/// Credentials for calling Cloud Resource Manager.
///
/// The token is obtained out of band (e.g. `gcloud auth print-access-token`)
/// and pasted into the credentials file.
#[derive(Deserialize, Default)]
pub(crate) struct GcpCredentials {
    pub(crate) access_token: String,
    /// Overrides the API base, e.g. for a private endpoint.
    pub(crate) url: Option<String>,
}

impl std::fmt::Debug for GcpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpCredentials")
            .field(
                "access_token",
                &if self.access_token.is_empty() {
                    ""
                } else {
                    "<redacted>"
                },
            )
            .field("url", &self.url)
            .finish()
    }
}

impl GcpCredentials {
    /// Perform simple field validation to catch bad input.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.access_token.is_empty() {
            return Err(anyhow!(
                "Credentials are missing. Please make sure your credentials.yaml file is correct. Credentials received: {:#?}", self
            ));
        }
        Ok(())
    }

    /// The API base, without a trailing slash.
    pub(crate) fn base_url(&self) -> String {
        self.url
            .as_deref()
            .unwrap_or(consts::DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_fails_validation() {
        assert!(GcpCredentials::default().validate().is_err());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let creds = GcpCredentials {
            access_token: "secret-token".to_owned(),
            url: None,
        };
        assert!(!format!("{creds:?}").contains("secret-token"));
    }

    #[test]
    fn base_url_defaults_and_trims() {
        assert_eq!(
            GcpCredentials::default().base_url(),
            consts::DEFAULT_API_URL
        );
        let creds = GcpCredentials {
            access_token: "t".to_owned(),
            url: Some("http://localhost:8080/v1/".to_owned()),
        };
        assert_eq!(creds.base_url(), "http://localhost:8080/v1");
    }
}
