//! The shared half of a System: its rules, its event sink and its status flag.
//!
//! A [`System`] is handed around as `Arc<System>`. The orchestrator keeps one copy
//! (through a [`SystemClient`](crate::clients::SystemClient)) to flip the status;
//! the worker thread keeps another to read it. Everything else on the struct is
//! immutable after construction.

use crate::event_queue::EventQueue;
use crate::model::error::{owned_name, ModelError};
use crate::model::ResourceAmount;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Run state of a System.
///
/// Only the orchestrator changes it. The worker reads it at the top of every loop
/// iteration and once more when scaling the processing delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemStatus {
    /// Processing time as configured.
    #[default]
    Standard,
    /// Processing time doubled.
    Slow,
    /// Processing time halved.
    Fast,
    /// Terminal: the worker loop exits at its next status check.
    Terminate,
}

impl SystemStatus {
    /// Processing delay for this status.
    ///
    /// Halving uses `Duration` arithmetic, so odd millisecond values are not truncated.
    pub fn scale(self, processing_time: Duration) -> Duration {
        match self {
            SystemStatus::Slow => processing_time.saturating_mul(2),
            SystemStatus::Fast => processing_time / 2,
            SystemStatus::Standard | SystemStatus::Terminate => processing_time,
        }
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SystemStatus::Standard => "STANDARD",
            SystemStatus::Slow => "SLOW",
            SystemStatus::Fast => "FAST",
            SystemStatus::Terminate => "TERMINATE",
        };
        f.write_str(label)
    }
}

/// Pacing pauses of the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTiming {
    /// Pause at the end of every cycle.
    pub pacing: Duration,
    /// Extra pause after a failed convert or store, so a persistent shortage does
    /// not flood the queue.
    pub backoff: Duration,
}

impl CycleTiming {
    pub const fn new(pacing: Duration, backoff: Duration) -> Self {
        Self { pacing, backoff }
    }
}

impl Default for CycleTiming {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(100),
            backoff: Duration::from_millis(500),
        }
    }
}

/// A worker entity that converts one resource into another over a simulated delay.
pub struct System {
    name: Arc<str>,
    consumed: ResourceAmount,
    produced: ResourceAmount,
    processing_time: Duration,
    status: Mutex<SystemStatus>,
    queue: Arc<EventQueue>,
    timing: CycleTiming,
}

impl System {
    /// Creates a System in the `Standard` state with default timing.
    ///
    /// # Arguments
    /// * `name` - System name (copied)
    /// * `consumed` - What one conversion takes
    /// * `produced` - What one conversion yields
    /// * `processing_time` - Simulated work per conversion
    /// * `queue` - Where failure events go
    ///
    /// # Errors
    /// [`ModelError::Allocation`] if the name cannot be copied.
    pub fn new(
        name: &str,
        consumed: ResourceAmount,
        produced: ResourceAmount,
        processing_time: Duration,
        queue: Arc<EventQueue>,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            name: owned_name(name, "system name")?,
            consumed,
            produced,
            processing_time,
            status: Mutex::new(SystemStatus::Standard),
            queue,
            timing: CycleTiming::default(),
        })
    }

    pub fn with_timing(mut self, timing: CycleTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_tag(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn consumed(&self) -> &ResourceAmount {
        &self.consumed
    }

    pub fn produced(&self) -> &ResourceAmount {
        &self.produced
    }

    pub fn processing_time(&self) -> Duration {
        self.processing_time
    }

    pub fn timing(&self) -> CycleTiming {
        self.timing
    }

    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    /// Snapshot of the status; the lock is released before this returns.
    pub fn status(&self) -> SystemStatus {
        *self.status.lock()
    }

    /// Replaces the status and returns the previous one. `Terminate` is final.
    pub(crate) fn set_status(&self, status: SystemStatus) -> SystemStatus {
        let mut current = self.status.lock();
        let previous = *current;
        if previous != SystemStatus::Terminate {
            *current = status;
        }
        previous
    }
}

impl fmt::Debug for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System")
            .field("name", &self.name)
            .field("consumed", &self.consumed)
            .field("produced", &self.produced)
            .field("processing_time", &self.processing_time)
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_by_status() {
        let base = Duration::from_millis(5);
        assert_eq!(SystemStatus::Standard.scale(base), base);
        assert_eq!(SystemStatus::Slow.scale(base), Duration::from_millis(10));
        assert_eq!(SystemStatus::Fast.scale(base), Duration::from_micros(2500));
        assert_eq!(SystemStatus::Terminate.scale(base), base);
    }

    #[test]
    fn test_new_system_starts_standard() {
        let queue = Arc::new(EventQueue::new());
        let system = System::new(
            "mine",
            ResourceAmount::none(),
            ResourceAmount::none(),
            Duration::ZERO,
            queue,
        )
        .unwrap();
        assert_eq!(system.name(), "mine");
        assert_eq!(system.status(), SystemStatus::Standard);
        assert_eq!(system.timing(), CycleTiming::default());
    }

    #[test]
    fn test_set_status_returns_previous() {
        let queue = Arc::new(EventQueue::new());
        let system = System::new(
            "mine",
            ResourceAmount::none(),
            ResourceAmount::none(),
            Duration::ZERO,
            queue,
        )
        .unwrap();
        assert_eq!(system.set_status(SystemStatus::Fast), SystemStatus::Standard);
        assert_eq!(system.set_status(SystemStatus::Terminate), SystemStatus::Fast);
        assert_eq!(system.status(), SystemStatus::Terminate);
        assert_eq!(system.set_status(SystemStatus::Standard), SystemStatus::Terminate);
        assert_eq!(system.status(), SystemStatus::Terminate);
    }
}
