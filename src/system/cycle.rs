//! One convert → delay → store → report iteration of a System.
//!
//! [`SystemRunner`] is the worker-private half of a System. It owns `amount_stored`
//! (produced units waiting to be placed), so no other thread can reach it and it
//! needs no lock.
//!
//! ## Locking discipline
//!
//! A cycle never holds two locks at once:
//! - convert locks the consumed resource, releases it, then sleeps;
//! - the status is read under its own lock and released before the sleep;
//! - store locks only the produced resource;
//! - a failed convert re-reads the consumed amount under a fresh lock; a failed
//!   store reports the amount read inside its own fill;
//! - the queue lock is taken last, on its own.
//!
//! With no nested acquisition there is no circular wait between workers, whatever
//! resources they share.

use crate::model::{Event, Priority, Resource, StatusCode};
use crate::system::entity::System;
use crate::system::error::CycleError;
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// What one cycle did. A step that was not attempted is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub convert: Option<StatusCode>,
    pub store: Option<StatusCode>,
}

fn status_of<T>(result: &Result<T, CycleError>) -> StatusCode {
    match result {
        Ok(_) => StatusCode::Ok,
        Err(e) => e.status(),
    }
}

/// Drives a single [`System`] on behalf of its worker thread.
#[derive(Debug)]
pub struct SystemRunner {
    system: Arc<System>,
    amount_stored: u32,
}

impl SystemRunner {
    pub fn new(system: Arc<System>) -> Self {
        Self {
            system,
            amount_stored: 0,
        }
    }

    pub fn system(&self) -> &Arc<System> {
        &self.system
    }

    /// Produced units not yet placed into the produced resource.
    pub fn amount_stored(&self) -> u32 {
        self.amount_stored
    }

    /// Consumes one rule's worth of input, simulates the work, and books the output
    /// as pending.
    ///
    /// With no consumed resource the conversion succeeds without taking anything.
    /// The processing delay is the cycle's only intentional suspension point and
    /// happens with no lock held.
    pub fn convert(&mut self) -> Result<(), CycleError> {
        let consumed = self.system.consumed();
        if let Some(resource) = &consumed.resource {
            resource.take(consumed.amount)?;
        }

        self.simulate_processing();

        let produced = self.system.produced();
        if produced.resource.is_some() {
            self.amount_stored = self.amount_stored.saturating_add(produced.amount);
        } else {
            self.amount_stored = 0;
        }
        Ok(())
    }

    /// Moves pending output into the produced resource, up to its free space.
    ///
    /// Returns the number of units stored. Anything that does not fit stays pending
    /// and the call fails with [`CycleError::Capacity`]. Without a produced resource
    /// there is nowhere to store, so the pending amount is dropped.
    pub fn store(&mut self) -> Result<u32, CycleError> {
        let Some(resource) = &self.system.produced().resource else {
            self.amount_stored = 0;
            return Ok(0);
        };
        if self.amount_stored == 0 {
            return Ok(0);
        }

        let fill = resource.fill(self.amount_stored);
        self.amount_stored = fill.remaining;
        if fill.remaining > 0 {
            return Err(CycleError::Capacity {
                stored: fill.stored,
                remaining: fill.remaining,
                amount: fill.amount_after,
            });
        }
        Ok(fill.stored)
    }

    /// Runs one full cycle: convert when nothing is pending, store when something
    /// is, report failures, then pause.
    pub fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        let timing = self.system.timing();

        if self.amount_stored == 0 {
            let result = self.convert();
            report.convert = Some(status_of(&result));
            if let Err(error) = result {
                let consumed = self.system.consumed().resource.clone();
                let amount = consumed.as_ref().map_or(0, |r| r.amount());
                self.report(error, consumed.as_ref(), Priority::HIGH, amount);
                thread::sleep(timing.backoff);
            }
        }

        if self.amount_stored > 0 {
            let result = self.store();
            report.store = Some(status_of(&result));
            if let Err(error) = result {
                let produced = self.system.produced().resource.clone();
                let amount = match error {
                    CycleError::Capacity { amount, .. } => amount,
                    _ => produced.as_ref().map_or(0, |r| r.amount()),
                };
                self.report(error, produced.as_ref(), Priority::LOW, amount);
                thread::sleep(timing.backoff);
            }
        }

        thread::sleep(timing.pacing);
        report
    }

    fn simulate_processing(&self) {
        let status = self.system.status();
        let delay = status.scale(self.system.processing_time());
        debug!(system = self.system.name(), %status, ?delay, "Processing");
        thread::sleep(delay);
    }

    /// Builds the failure event and queues it.
    ///
    /// A failed convert reports a fresh snapshot of the consumed resource; a failed
    /// store reports the amount its fill left behind.
    fn report(
        &self,
        error: CycleError,
        resource: Option<&Arc<Resource>>,
        priority: Priority,
        amount: u32,
    ) {
        let event = Event::new(
            self.system.name_tag(),
            resource.map(|r| r.name_tag()),
            error.status(),
            priority,
            amount,
        );
        debug!(system = self.system.name(), %error, amount, "Reporting");
        if let Err(e) = self.system.queue().push(event) {
            warn!(system = self.system.name(), error = %e, "Event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_queue::EventQueue;
    use crate::model::ResourceAmount;
    use crate::system::entity::CycleTiming;
    use std::time::Duration;

    const NO_PAUSE: CycleTiming = CycleTiming::new(Duration::ZERO, Duration::ZERO);

    fn runner(
        consumed: ResourceAmount,
        produced: ResourceAmount,
    ) -> (SystemRunner, Arc<EventQueue>) {
        let queue = Arc::new(EventQueue::new());
        let system = System::new(
            "smelter",
            consumed,
            produced,
            Duration::ZERO,
            Arc::clone(&queue),
        )
        .unwrap()
        .with_timing(NO_PAUSE);
        (SystemRunner::new(Arc::new(system)), queue)
    }

    #[test]
    fn test_convert_empty_resource_emits_high_event() {
        let ore = Resource::create("ore", 0, 10).unwrap();
        let (mut runner, queue) = runner(
            ResourceAmount::new(Arc::clone(&ore), 5),
            ResourceAmount::none(),
        );

        assert_eq!(runner.convert(), Err(CycleError::Empty));

        let report = runner.run_cycle();
        assert_eq!(report.convert, Some(StatusCode::Empty));
        assert_eq!(report.store, None);

        let event = queue.pop().expect("event expected");
        assert_eq!(event.status, StatusCode::Empty);
        assert_eq!(event.priority, Priority::HIGH);
        assert_eq!(event.amount, 0);
        assert_eq!(event.resource.as_deref(), Some("ore"));
        assert_eq!(&*event.system, "smelter");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_convert_insufficient_resource_snapshots_amount() {
        let ore = Resource::create("ore", 3, 10).unwrap();
        let (mut runner, queue) = runner(
            ResourceAmount::new(Arc::clone(&ore), 5),
            ResourceAmount::none(),
        );

        let report = runner.run_cycle();
        assert_eq!(report.convert, Some(StatusCode::Insufficient));
        assert_eq!(ore.amount(), 3);

        let event = queue.pop().expect("event expected");
        assert_eq!(event.status, StatusCode::Insufficient);
        assert_eq!(event.priority, Priority::HIGH);
        assert_eq!(event.amount, 3);
    }

    #[test]
    fn test_convert_without_input_always_succeeds() {
        let ore = Resource::create("ore", 0, 10).unwrap();
        let (mut runner, queue) = runner(
            ResourceAmount::none(),
            ResourceAmount::new(Arc::clone(&ore), 4),
        );

        let report = runner.run_cycle();
        assert_eq!(report.convert, Some(StatusCode::Ok));
        assert_eq!(report.store, Some(StatusCode::Ok));
        assert_eq!(ore.amount(), 4);
        assert_eq!(runner.amount_stored(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_convert_without_output_leaves_nothing_pending() {
        let ore = Resource::create("ore", 10, 10).unwrap();
        let (mut runner, queue) = runner(
            ResourceAmount::new(Arc::clone(&ore), 4),
            ResourceAmount::none(),
        );

        let report = runner.run_cycle();
        assert_eq!(report.convert, Some(StatusCode::Ok));
        assert_eq!(report.store, None);
        assert_eq!(ore.amount(), 6);
        assert_eq!(runner.amount_stored(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_store_partial_fill_reports_capacity() {
        let ingot = Resource::create("ingot", 8, 10).unwrap();
        let (mut runner, _queue) = runner(
            ResourceAmount::none(),
            ResourceAmount::new(Arc::clone(&ingot), 5),
        );
        runner.amount_stored = 5;

        assert_eq!(
            runner.store(),
            Err(CycleError::Capacity {
                stored: 2,
                remaining: 3,
                amount: 10,
            })
        );
        assert_eq!(ingot.amount(), 10);
        assert_eq!(runner.amount_stored(), 3);
    }

    #[test]
    fn test_store_full_resource_leaves_pending_unchanged() {
        let ingot = Resource::create("ingot", 10, 10).unwrap();
        let (mut runner, queue) = runner(
            ResourceAmount::none(),
            ResourceAmount::new(Arc::clone(&ingot), 5),
        );
        runner.amount_stored = 5;

        let report = runner.run_cycle();
        // Something was pending, so convert was skipped.
        assert_eq!(report.convert, None);
        assert_eq!(report.store, Some(StatusCode::Capacity));
        assert_eq!(runner.amount_stored(), 5);

        let event = queue.pop().expect("event expected");
        assert_eq!(event.status, StatusCode::Capacity);
        assert_eq!(event.priority, Priority::LOW);
        assert_eq!(event.amount, 10);
        assert_eq!(event.resource.as_deref(), Some("ingot"));
    }

    #[test]
    fn test_store_with_enough_space_zeroes_pending() {
        let ingot = Resource::create("ingot", 2, 10).unwrap();
        let (mut runner, _queue) = runner(
            ResourceAmount::none(),
            ResourceAmount::new(Arc::clone(&ingot), 5),
        );
        runner.amount_stored = 5;

        assert_eq!(runner.store(), Ok(5));
        assert_eq!(runner.amount_stored(), 0);
        assert_eq!(ingot.amount(), 7);
    }

    #[test]
    fn test_store_without_output_drains_pending() {
        let (mut runner, queue) = runner(ResourceAmount::none(), ResourceAmount::none());
        runner.amount_stored = 7;
        assert_eq!(runner.store(), Ok(0));
        assert_eq!(runner.amount_stored(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_conversion_moves_stock() {
        let ore = Resource::create("ore", 10, 20).unwrap();
        let ingot = Resource::create("ingot", 0, 20).unwrap();
        let (mut runner, queue) = runner(
            ResourceAmount::new(Arc::clone(&ore), 5),
            ResourceAmount::new(Arc::clone(&ingot), 2),
        );

        runner.run_cycle();
        runner.run_cycle();
        let report = runner.run_cycle();

        assert_eq!(report.convert, Some(StatusCode::Empty));
        assert_eq!(ore.amount(), 0);
        assert_eq!(ingot.amount(), 4);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_capacity_backlog_blocks_conversion() {
        let ore = Resource::create("ore", 20, 20).unwrap();
        let ingot = Resource::create("ingot", 9, 10).unwrap();
        let (mut runner, queue) = runner(
            ResourceAmount::new(Arc::clone(&ore), 1),
            ResourceAmount::new(Arc::clone(&ingot), 3),
        );

        let first = runner.run_cycle();
        assert_eq!(first.convert, Some(StatusCode::Ok));
        assert_eq!(first.store, Some(StatusCode::Capacity));
        assert_eq!(runner.amount_stored(), 2);

        // Pending output keeps convert from running again.
        let second = runner.run_cycle();
        assert_eq!(second.convert, None);
        assert_eq!(ore.amount(), 19);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_capacity_event_carries_post_fill_amount_under_contention() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let ingot = Resource::create("ingot", 10, 10).unwrap();
        let (mut runner, queue) = runner(
            ResourceAmount::none(),
            ResourceAmount::new(Arc::clone(&ingot), 5),
        );
        runner.amount_stored = 5;

        // A neighbour keeps taking a unit and putting it back, so the amount moves
        // between the runner's fill and its report.
        let stop = Arc::new(AtomicBool::new(false));
        let churn = {
            let ingot = Arc::clone(&ingot);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    if ingot.take(1).is_ok() {
                        ingot.fill(1);
                    }
                }
            })
        };

        for _ in 0..20_000 {
            runner.run_cycle();
        }
        stop.store(true, Ordering::Relaxed);
        churn.join().unwrap();

        let events = queue.drain();
        assert!(!events.is_empty());
        for event in events {
            assert_eq!(event.status, StatusCode::Capacity);
            assert_eq!(event.priority, Priority::LOW);
            assert_eq!(event.amount, 10, "{event:?}");
        }
    }
}
