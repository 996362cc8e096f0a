//! Project configuration and credentials.
//!
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use log::debug;
use serde::{Deserialize, Serialize};
use yaml_peg::serde as yaml;

use crate::project;

/// Struct representing the orgiam_config.yaml file.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct OrgIamConfig {
    version: String,
    name: String,
    /// Where the recorded state lives, relative to the project.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    /// Every managed resource, in apply order.
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

fn default_state_file() -> PathBuf {
    project::state_file_path_local()
}

impl OrgIamConfig {
    /// Read and parse a config file.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<OrgIamConfig> {
        debug!("reading config from {:?}", path.as_ref());
        let config_raw = fs::read_to_string(&path).context("Reading file")?;
        let mut config =
            yaml::from_str::<OrgIamConfig>(&config_raw).context("Deserializing config")?;
        config.pop().ok_or_else(|| anyhow!["config file is empty"])
    }

    /// Get the name
    pub fn get_name(&self) -> String {
        self.name.to_owned()
    }
}

/// Config for one managed resource.
#[derive(Clone, Deserialize, Serialize, Default, Debug, PartialEq, Eq)]
pub struct ResourceConfig {
    /// The resource type, e.g. `google_organization_iam_policy`
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource-specific fields
    #[serde(flatten)]
    pub config: HashMap<String, String>,
}

impl ResourceConfig {
    /// Basic constructor
    pub fn new(resource_type: String, config: HashMap<String, String>) -> Self {
        Self {
            resource_type,
            config,
        }
    }

    /// Fetch a required field, with a useful error when it is missing.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.config.get(key).map(String::as_str).ok_or_else(|| {
            anyhow!(
                "{} resource is missing required field `{}`",
                self.resource_type,
                key
            )
        })
    }
}

/// Alias for HashMap to hold credentials information.
pub type CredentialsMap = HashMap<String, String>;

/// Fetch the credentials profiles from a credentials file.
pub fn fetch_credentials(path: PathBuf) -> Result<HashMap<String, CredentialsMap>> {
    debug!("Trying to read credentials from {:?}", path);
    let credentials_raw = fs::read_to_string(&path)
        .with_context(|| format!("reading credentials file {}", path.display()))?;
    let mut config = yaml::from_str::<HashMap<String, CredentialsMap>>(&credentials_raw)?;

    config
        .pop()
        .ok_or_else(|| anyhow!["failed to generate credentials"])
}
