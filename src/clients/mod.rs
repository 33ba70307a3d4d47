//! Control handles the orchestrator uses to steer running Systems.

pub mod system_client;

pub use system_client::*;
