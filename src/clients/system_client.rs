//! # System Client
//!
//! Orchestrator-side handle for a running [`System`]. It is the only writer of a
//! System's status; the worker thread only reads it.
use crate::system::{System, SystemStatus};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Cloneable control handle for one System.
#[derive(Clone, Debug)]
pub struct SystemClient {
    inner: Arc<System>,
}

impl SystemClient {
    pub fn new(inner: Arc<System>) -> Self {
        Self { inner }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// The shared System, e.g. to hand to a worker thread.
    pub fn system(&self) -> &Arc<System> {
        &self.inner
    }

    pub fn status(&self) -> SystemStatus {
        self.inner.status()
    }

    /// Sets the status and returns the previous one.
    ///
    /// The worker sees the change at its next status read. A System that was told to
    /// terminate stays terminated: later calls are ignored.
    #[instrument(skip(self), fields(system = %self.inner.name()))]
    pub fn set_status(&self, status: SystemStatus) -> SystemStatus {
        let previous = self.inner.set_status(status);
        if previous == SystemStatus::Terminate {
            debug!("Already terminated");
        } else {
            debug!(%previous, "Status changed");
        }
        previous
    }

    /// Doubles the processing time.
    pub fn slow_down(&self) -> SystemStatus {
        self.set_status(SystemStatus::Slow)
    }

    /// Halves the processing time.
    pub fn speed_up(&self) -> SystemStatus {
        self.set_status(SystemStatus::Fast)
    }

    /// Back to the configured processing time.
    pub fn standard(&self) -> SystemStatus {
        self.set_status(SystemStatus::Standard)
    }

    /// Asks the worker to exit after its current cycle.
    pub fn terminate(&self) -> SystemStatus {
        self.set_status(SystemStatus::Terminate)
    }
}
