//! # Lifecycle
//!
//! Everything that turns a description of an economy into running threads and back:
//!
//! - [`config`] - [`ProductionConfig`], loaded from JSON
//! - [`production_system`] - [`ProductionSystem`], which starts workers and stops them
//! - [`consumer`] - the event-draining task and its [`EventHandler`] hook
//! - [`tracing`](mod@tracing) - [`setup_tracing`]

pub mod config;
pub mod consumer;
pub mod error;
pub mod production_system;
pub mod tracing;

pub use config::{AmountConfig, ProductionConfig, ResourceConfig, SystemConfig, TimingConfig};
pub use consumer::{consume_events, EventHandler, EventSummary, LoggingHandler};
pub use error::{ConfigError, LifecycleError};
pub use production_system::{ProductionSystem, ShutdownReport};
pub use self::tracing::setup_tracing;
