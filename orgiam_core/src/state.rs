//! Recorded state, kept by the orchestrator between runs.
//!
//! The state file maps a resource id to the fields the last successful
//! verb returned. Resources never touch this; only the orchestrator does.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::resource::{Fields, ResourceId};

/// What the orchestrator remembers about one resource.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RecordedResource {
    /// The resource type, e.g. `google_organization_iam_policy`
    #[serde(rename = "type")]
    pub resource_type: String,
    /// The fields returned by the last verb
    pub fields: Fields,
}

#[derive(Deserialize, Serialize, Debug, Default)]
struct StateFile {
    resources: BTreeMap<ResourceId, RecordedResource>,
}

/// A JSON-backed state store.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    state: StateFile,
}

impl StateStore {
    /// Load the store from `path`. A missing file is an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let state = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading state file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing state file {}", path.display()))?
        } else {
            debug!("no state file at {:?}; starting empty", path);
            StateFile::default()
        };
        Ok(Self { path, state })
    }

    /// Recorded state for `id`, if any.
    pub fn get(&self, id: &ResourceId) -> Option<&RecordedResource> {
        self.state.resources.get(id)
    }

    /// Record (or overwrite) the state for `id`.
    pub fn put(&mut self, id: ResourceId, resource: RecordedResource) {
        self.state.resources.insert(id, resource);
    }

    /// Forget `id`. Returns what was recorded.
    pub fn remove(&mut self, id: &ResourceId) -> Option<RecordedResource> {
        self.state.resources.remove(id)
    }

    /// All recorded resources, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceId, &RecordedResource)> {
        self.state.resources.iter()
    }

    /// Write the store back to disk, creating parent directories.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("creating state directory")?;
            }
        }
        let raw = serde_json::to_string_pretty(&self.state).context("serializing state")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing state file {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded(policy: &str) -> RecordedResource {
        RecordedResource {
            resource_type: "google_organization_iam_policy".to_owned(),
            fields: Fields::from([
                ("org_id".to_owned(), "123".to_owned()),
                ("policy_data".to_owned(), policy.to_owned()),
            ]),
        }
    }

    #[test]
    fn missing_file_loads_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = StateStore::load(dir.path().join("nope.json"))?;
        assert_eq!(store.iter().count(), 0);
        Ok(())
    }

    #[test]
    fn state_survives_a_save_and_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(".data").join("state.json");
        let id = ResourceId::from("organizations/123");

        let mut store = StateStore::load(&path)?;
        store.put(id.clone(), recorded(r#"{"bindings":[]}"#));
        store.save()?;

        let reloaded = StateStore::load(&path)?;
        assert_eq!(reloaded.get(&id), Some(&recorded(r#"{"bindings":[]}"#)));
        Ok(())
    }

    #[test]
    fn remove_forgets_the_resource() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let id = ResourceId::from("organizations/123");
        let mut store = StateStore::load(dir.path().join("state.json"))?;
        store.put(id.clone(), recorded("{}"));
        assert!(store.remove(&id).is_some());
        assert!(store.get(&id).is_none());
        Ok(())
    }
}
