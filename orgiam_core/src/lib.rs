//!
//! Core of orgiam
//!
//! Provides the lifecycle contract every managed resource implements, the
//! declarative schema it publishes, and the project plumbing (config files,
//! recorded state, logging) the orchestrator needs to drive it.
#![deny(missing_docs)]

pub use config::fetch_credentials;
pub use config::OrgIamConfig;
pub use resource::{LifecycleError, Resource, ResourceId};
pub use schema::{FieldSchema, ResourceSchema};

pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod project;
pub mod resource;
pub mod schema;
pub mod state;

#[macro_export]
/// Time the code inside the macro. Write the elapsed time to debug logs.
/// Derived from https://notes.iveselov.info/programming/time_it-a-case-study-in-rust-macros
macro_rules! log_runtime {
    ($context:expr, $($tt:tt)+) => {
        {
            $crate::logging::debug!("{}: starting", $context);
            let timer = std::time::Instant::now();
            let x =
            $(
                $tt
            )+;
            $crate::logging::debug!("{}: {:?}", $context, timer.elapsed());
            x
        }
    }
}
