//! Events: prioritized reports of a System's cycle outcome.
//!
//! An [`Event`] is a plain value. It tags its origin by name rather than holding the
//! System or Resource itself, so an event sitting in the queue never keeps either
//! alive and never needs a lock to be read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Result codes shared by cycle outcomes and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    Ok,
    /// The consumed resource was at zero.
    Empty,
    /// The consumed resource was positive but below the requested amount.
    Insufficient,
    /// The produced resource could not absorb all pending output.
    Capacity,
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusCode::Ok => "OK",
            StatusCode::Empty => "EMPTY",
            StatusCode::Insufficient => "INSUFFICIENT",
            StatusCode::Capacity => "CAPACITY",
        };
        f.write_str(label)
    }
}

/// Event urgency. Higher values are popped first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub u8);

impl Priority {
    /// Consumption failures.
    pub const HIGH: Priority = Priority(2);
    /// Capacity failures.
    pub const LOW: Priority = Priority(1);
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A status change reported by a System.
///
/// `amount` is a snapshot taken by the reporter at creation time; the event never
/// re-reads the resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub system: Arc<str>,
    pub resource: Option<Arc<str>>,
    pub status: StatusCode,
    pub priority: Priority,
    pub amount: u32,
}

impl Event {
    /// Pure construction. No locking, no side effects.
    pub fn new(
        system: Arc<str>,
        resource: Option<Arc<str>>,
        status: StatusCode,
        priority: Priority,
        amount: u32,
    ) -> Self {
        Self {
            system,
            resource,
            status,
            priority,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::HIGH > Priority::LOW);
        assert!(Priority(10) > Priority::HIGH);
    }

    #[test]
    fn test_event_new_keeps_fields() {
        let event = Event::new(
            "smelter".into(),
            Some("ore".into()),
            StatusCode::Insufficient,
            Priority::HIGH,
            3,
        );
        assert_eq!(&*event.system, "smelter");
        assert_eq!(event.resource.as_deref(), Some("ore"));
        assert_eq!(event.status, StatusCode::Insufficient);
        assert_eq!(event.priority, Priority::HIGH);
        assert_eq!(event.amount, 3);
    }

    #[test]
    fn test_status_code_serializes_upper_case() {
        let json = serde_json::to_string(&StatusCode::Insufficient).unwrap();
        assert_eq!(json, "\"INSUFFICIENT\"");
        assert_eq!(StatusCode::Capacity.to_string(), "CAPACITY");
    }
}
