//! Error types for a System's run cycle.

use crate::model::StatusCode;
use thiserror::Error;

/// Recoverable outcomes of a convert or store step.
///
/// None of these stops a worker. Each is reported as an [`Event`](crate::model::Event)
/// and the loop carries on.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CycleError {
    /// The consumed resource is at zero.
    #[error("resource is empty")]
    Empty,

    /// The consumed resource holds some units, but fewer than the rule needs.
    #[error("insufficient resource: requested {requested}, available {available}")]
    Insufficient { requested: u32, available: u32 },

    /// The produced resource is full; `remaining` units are still pending.
    /// `amount` is the resource's amount right after the fill, read under its lock.
    #[error("capacity reached: stored {stored}, {remaining} still pending")]
    Capacity {
        stored: u32,
        remaining: u32,
        amount: u32,
    },
}

impl CycleError {
    /// The status code reported in the event for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            CycleError::Empty => StatusCode::Empty,
            CycleError::Insufficient { .. } => StatusCode::Insufficient,
            CycleError::Capacity { .. } => StatusCode::Capacity,
        }
    }
}
