//! Path utilities for project organization.
//!
//! The project structure currently looks like this:
//!
//! ```text
//! pwd
//!  └── {project_name}
//!       ├── orgiam_config.yaml
//!       ├── .data
//!       │    └── orgiam_state.json
//!       └── policies
//!            └── <org>.json
//!
//! ~
//!  └── .orgiam
//!       └── credentials.yaml
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;

lazy_static! {
    static ref DATA_DIR: PathBuf = PathBuf::from(".data");
    static ref STATE_FILE: PathBuf = PathBuf::from("orgiam_state.json");
    static ref CREDENTIALS_CFG: PathBuf = PathBuf::from("credentials.yaml");
    static ref PROFILE_CFG_DIR: PathBuf = PathBuf::from(".orgiam");
}

/// Path for the credentials file.
pub fn credentials_cfg_path() -> Result<PathBuf> {
    Ok(home_dir()
        .ok_or_else(|| anyhow!("unable to find home directory"))?
        .join(PROFILE_CFG_DIR.as_path())
        .join(CREDENTIALS_CFG.as_path()))
}

/// Default local path for the recorded state.
pub fn state_file_path_local() -> PathBuf {
    DATA_DIR.as_path().join(STATE_FILE.as_path())
}
