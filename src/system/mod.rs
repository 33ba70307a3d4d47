//! # Systems
//!
//! Worker entities that turn one resource into another.
//!
//! ## Structure
//!
//! - [`entity`] - [`System`], [`SystemStatus`] and [`CycleTiming`]: the shared part,
//!   read by the worker and flipped by the orchestrator
//! - [`cycle`] - [`SystemRunner`]: the worker-private part and the convert/store cycle
//! - [`worker`] - [`run_worker`] / [`spawn_worker`]: the thread entry
//! - [`error`] - [`CycleError`] for recoverable cycle outcomes
//!
//! ## Usage
//!
//! ```rust
//! use production_economy::event_queue::EventQueue;
//! use production_economy::model::{Resource, ResourceAmount};
//! use production_economy::system::{CycleTiming, System, SystemRunner};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let queue = Arc::new(EventQueue::new());
//! let ore = Resource::create("ore", 10, 10).unwrap();
//! let ingot = Resource::create("ingot", 0, 10).unwrap();
//!
//! let smelter = System::new(
//!     "smelter",
//!     ResourceAmount::new(ore.clone(), 5),
//!     ResourceAmount::new(ingot.clone(), 2),
//!     Duration::ZERO,
//!     queue.clone(),
//! )
//! .unwrap()
//! .with_timing(CycleTiming::new(Duration::ZERO, Duration::ZERO));
//!
//! let mut runner = SystemRunner::new(Arc::new(smelter));
//! runner.run_cycle();
//! assert_eq!(ore.amount(), 5);
//! assert_eq!(ingot.amount(), 2);
//! ```

pub mod cycle;
pub mod entity;
pub mod error;
pub mod worker;

pub use cycle::{CycleReport, SystemRunner};
pub use entity::{CycleTiming, System, SystemStatus};
pub use error::CycleError;
pub use worker::{run_worker, spawn_worker};
