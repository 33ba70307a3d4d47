//! Error types for constructing model entities.

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors raised while creating a [`Resource`](crate::model::Resource),
/// a [`System`](crate::system::System) or growing a [`Registry`](crate::model::Registry).
///
/// These are construction-time failures. They are surfaced to the caller and never
/// leave a partially initialized entity behind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Memory for an owned field or a new slot could not be reserved.
    #[error("failed to allocate {what}: {source}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// The initial amount of a resource exceeds its capacity.
    #[error("invalid capacity for resource '{name}': amount {amount} exceeds max {max_capacity}")]
    InvalidCapacity {
        name: String,
        amount: u32,
        max_capacity: u32,
    },
}

impl ModelError {
    pub(crate) fn allocation(what: &'static str, source: TryReserveError) -> Self {
        ModelError::Allocation { what, source }
    }
}

/// Copies `name` into a freshly reserved `Arc<str>`, reporting allocation failure
/// instead of aborting.
pub(crate) fn owned_name(
    name: &str,
    what: &'static str,
) -> Result<std::sync::Arc<str>, ModelError> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(name.len())
        .map_err(|e| ModelError::allocation(what, e))?;
    owned.push_str(name);
    Ok(owned.into())
}
