//! Error types for the event queue.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    /// No room could be reserved for the new node. The queue is left unchanged.
    #[error("failed to allocate event node: {0}")]
    Allocation(#[source] TryReserveError),
}
