//! The lifecycle contract every managed resource implements.
//!
//! An orchestrator calls these four verbs in response to changes in the
//! user's configuration. Each verb gets everything it needs (the injected
//! client lives on the implementing type) and returns the state the
//! orchestrator should record.

use std::collections::HashMap;
use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::schema::ResourceSchema;

/// The orchestrator-visible stable key of a managed resource. Opaque.
#[derive(Clone, Deserialize, Debug, Hash, PartialEq, Eq, Default, PartialOrd, Ord, Serialize)]
pub struct ResourceId(pub String);

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId(s.to_owned())
    }
}

/// Flat field view of a config or state, keyed by schema field name.
pub type Fields = HashMap<String, String>;

/// Errors a resource can hand back to the orchestrator.
pub trait LifecycleError: std::error::Error + Send + Sync + 'static {
    /// True when the remote side reports the resource as absent. The
    /// orchestrator drops the resource from its state instead of failing.
    fn is_not_found(&self) -> bool;
}

/// The trait all managed resources are expected to implement.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Desired state, as authored by the user.
    type Config: Send + Sync;
    /// Recorded state, as returned by the verbs.
    type State: Send + Sync;
    /// Error type for all verbs.
    type Error: LifecycleError;

    /// The declarative field contract for this resource type.
    fn schema() -> ResourceSchema;
    /// The identity of a recorded state.
    fn id(state: &Self::State) -> ResourceId;
    /// Flatten a config into schema fields (used for planning).
    fn config_fields(config: &Self::Config) -> Fields;
    /// Flatten a state into schema fields (used for planning).
    fn state_fields(state: &Self::State) -> Fields;

    /// Bring a new resource into existence and return its normalized state.
    async fn create(&self, config: &Self::Config) -> Result<Self::State, Self::Error>;
    /// Refresh the recorded state from the remote side.
    async fn read(&self, id: &ResourceId) -> Result<Self::State, Self::Error>;
    /// Move an existing resource to the desired config.
    async fn update(
        &self,
        prior: &Self::State,
        config: &Self::Config,
    ) -> Result<Self::State, Self::Error>;
    /// Tear the resource down.
    async fn delete(&self, state: &Self::State) -> Result<(), Self::Error>;
}
