//! # Production Economy
//!
//! > **A multi-threaded simulation of a resource economy.**
//!
//! Named, capacity-bounded [`Resource`](model::Resource)s are shared by
//! [`System`](system::System)s, each running on its own thread. A System repeatedly
//! takes some of one resource, works for a while, and puts some of another resource
//! back. When it cannot (its input ran dry, or its output is full) it reports an
//! [`Event`](model::Event) to a shared, priority-ordered [`EventQueue`](event_queue::EventQueue).
//! An orchestrator watches that queue and can slow a System down, speed it up, or
//! stop it.
//!
//! ## 🏗️ Concurrency Model
//!
//! - Each Resource, each System's status and the event queue has its own
//!   `parking_lot::Mutex`. No code path ever holds two of them at once, so workers
//!   sharing any set of resources cannot deadlock.
//! - The processing delay is slept with no lock held.
//! - A System's pending output lives in its worker's
//!   [`SystemRunner`](system::SystemRunner) and is invisible to every other thread.
//! - Stopping is cooperative: workers poll their status once per cycle.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! Resources, events and the [`Registry`](model::Registry) the orchestrator keeps them in.
//!
//! ### 2. The Mailbox ([`event_queue`])
//! Highest priority first, first-in-first-out among equals.
//!
//! ### 3. The Workers ([`system`])
//! The convert → process → store cycle and the thread entry that repeats it.
//!
//! ### 4. The Interface ([`clients`])
//! [`SystemClient`](clients::SystemClient): the only way to change a System's status.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! Builds an economy from a [`ProductionConfig`](lifecycle::ProductionConfig), runs it
//! with [`ProductionSystem`](lifecycle::ProductionSystem) and shuts it down.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the built-in mine → smelter → forge chain
//! RUST_LOG=info cargo run
//!
//! # Run your own economy
//! PRODUCTION_CONFIG=economy.json cargo run
//! ```

pub mod clients;
pub mod event_queue;
pub mod lifecycle;
pub mod model;
pub mod system;
