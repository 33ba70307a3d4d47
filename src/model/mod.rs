//! Shared data model: resources, events and the orchestrator's bookkeeping list.

pub mod error;
pub mod event;
pub mod registry;
pub mod resource;

pub use error::ModelError;
pub use event::{Event, Priority, StatusCode};
pub use registry::Registry;
pub use resource::{Resource, ResourceAmount, ResourceSnapshot};
