//! # Event Consumer
//!
//! The orchestrator side of the [`EventQueue`]: a Tokio task that pops events in
//! priority order and hands each to an [`EventHandler`].
//!
//! Workers never wait on the consumer. They push and move on; the consumer polls on
//! an interval and drains whatever has accumulated. On shutdown it drains once more,
//! so events pushed by a worker's last cycle are still seen.

use crate::event_queue::EventQueue;
use crate::model::{Event, Priority, StatusCode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Reaction to a popped event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn on_event(&self, event: &Event);
}

/// Logs every event. Shortages (HIGH) at `warn`, everything else at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

#[async_trait]
impl EventHandler for LoggingHandler {
    async fn on_event(&self, event: &Event) {
        let resource = event.resource.as_deref().unwrap_or("-");
        if event.priority >= Priority::HIGH {
            warn!(
                system = %event.system,
                resource,
                status = %event.status,
                amount = event.amount,
                "Input shortage"
            );
        } else {
            info!(
                system = %event.system,
                resource,
                status = %event.status,
                priority = %event.priority,
                amount = event.amount,
                "Output backlog"
            );
        }
    }
}

/// Running totals of consumed events.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub total: u64,
    pub empty: u64,
    pub insufficient: u64,
    pub capacity: u64,
    pub other: u64,
    pub high_priority: u64,
    pub low_priority: u64,
}

impl EventSummary {
    pub fn record(&mut self, event: &Event) {
        self.total += 1;
        match event.status {
            StatusCode::Empty => self.empty += 1,
            StatusCode::Insufficient => self.insufficient += 1,
            StatusCode::Capacity => self.capacity += 1,
            StatusCode::Ok => self.other += 1,
        }
        if event.priority >= Priority::HIGH {
            self.high_priority += 1;
        } else {
            self.low_priority += 1;
        }
    }
}

async fn drain(queue: &EventQueue, handler: &dyn EventHandler, summary: &mut EventSummary) {
    // `pop` releases the queue lock before returning, so no lock is held across
    // the handler's await.
    while let Some(event) = queue.pop() {
        summary.record(&event);
        handler.on_event(&event).await;
    }
}

/// Drains `queue` every `poll` until `shutdown` fires (or its sender is dropped),
/// then drains one final time and returns the totals.
///
/// A zero `poll` is treated as one millisecond.
pub async fn consume_events(
    queue: Arc<EventQueue>,
    handler: Arc<dyn EventHandler>,
    poll: Duration,
    mut shutdown: oneshot::Receiver<()>,
) -> EventSummary {
    let mut summary = EventSummary::default();
    let mut ticker = tokio::time::interval(poll.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(?poll, "Event consumer started");

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => drain(&queue, handler.as_ref(), &mut summary).await,
        }
    }

    drain(&queue, handler.as_ref(), &mut summary).await;
    debug!(?summary, "Final drain done");
    info!(total = summary.total, "Event consumer stopped");
    summary
}
