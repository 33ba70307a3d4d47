//! A named, capacity-bounded counter shared by every System that consumes or
//! produces it.
//!
//! # Locking
//! `amount` and `max_capacity` live behind one `parking_lot::Mutex`. Every read
//! and every mutation takes that lock for the shortest possible section and
//! releases it through guard scope, so no early return can leave it held.
//!
//! Mutation is crate-private: stock only moves through the
//! convert and store steps of a [`SystemRunner`](crate::system::SystemRunner),
//! which call the crate-private [`Resource::take`] and [`Resource::fill`].

use crate::model::error::{owned_name, ModelError};
use crate::system::CycleError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
struct Stock {
    amount: u32,
    max_capacity: u32,
}

pub struct Resource {
    name: Arc<str>,
    stock: Mutex<Stock>,
}

/// Point-in-time copy of a resource's counters, taken under its lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub name: String,
    pub amount: u32,
    pub max_capacity: u32,
}

/// Outcome of a store attempt against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fill {
    /// Units actually added.
    pub stored: u32,
    /// Units left over because the resource ran out of space.
    pub remaining: u32,
    /// Resource amount after the update, read under the same lock.
    pub amount_after: u32,
}

impl Resource {
    /// Creates a new shared resource.
    ///
    /// # Arguments
    /// * `name` - Resource name (copied)
    /// * `amount` - Initial stock
    /// * `max_capacity` - Upper bound for the stock
    ///
    /// # Errors
    /// - [`ModelError::InvalidCapacity`] if `amount > max_capacity`
    /// - [`ModelError::Allocation`] if the name cannot be copied
    pub fn create(name: &str, amount: u32, max_capacity: u32) -> Result<Arc<Self>, ModelError> {
        if amount > max_capacity {
            return Err(ModelError::InvalidCapacity {
                name: name.to_string(),
                amount,
                max_capacity,
            });
        }
        let name = owned_name(name, "resource name")?;
        Ok(Arc::new(Self {
            name,
            stock: Mutex::new(Stock {
                amount,
                max_capacity,
            }),
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name, used to tag events without copying.
    pub fn name_tag(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn amount(&self) -> u32 {
        self.stock.lock().amount
    }

    pub fn max_capacity(&self) -> u32 {
        self.stock.lock().max_capacity
    }

    /// Reads both counters under a single lock acquisition.
    pub fn snapshot(&self) -> ResourceSnapshot {
        let stock = self.stock.lock();
        ResourceSnapshot {
            name: self.name.to_string(),
            amount: stock.amount,
            max_capacity: stock.max_capacity,
        }
    }

    /// Removes `requested` units if they are all available.
    ///
    /// Returns the amount left after the withdrawal. Nothing is taken on failure:
    /// [`CycleError::Empty`] when the stock is zero, [`CycleError::Insufficient`]
    /// when it is positive but short.
    pub(crate) fn take(&self, requested: u32) -> Result<u32, CycleError> {
        let mut stock = self.stock.lock();
        if stock.amount >= requested {
            stock.amount -= requested;
            Ok(stock.amount)
        } else if stock.amount == 0 {
            Err(CycleError::Empty)
        } else {
            Err(CycleError::Insufficient {
                requested,
                available: stock.amount,
            })
        }
    }

    /// Adds as much of `pending` as the remaining space allows.
    pub(crate) fn fill(&self, pending: u32) -> Fill {
        let mut stock = self.stock.lock();
        let available_space = stock.max_capacity - stock.amount;
        let stored = pending.min(available_space);
        stock.amount += stored;
        Fill {
            stored,
            remaining: pending - stored,
            amount_after: stock.amount,
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stock = self.stock.lock();
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("amount", &stock.amount)
            .field("max_capacity", &stock.max_capacity)
            .finish()
    }
}

/// "This many units of that resource."
///
/// An absent resource means the rule consumes or yields nothing.
#[derive(Debug, Clone)]
pub struct ResourceAmount {
    pub resource: Option<Arc<Resource>>,
    pub amount: u32,
}

impl ResourceAmount {
    pub fn new(resource: Arc<Resource>, amount: u32) -> Self {
        Self {
            resource: Some(resource),
            amount,
        }
    }

    /// A rule that involves no resource.
    pub fn none() -> Self {
        Self {
            resource: None,
            amount: 0,
        }
    }
}
