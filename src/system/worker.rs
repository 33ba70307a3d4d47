//! Worker thread entry.
//!
//! One OS thread per System. The loop polls the System's status before every cycle
//! and returns once it reads `Terminate`. Cancellation is cooperative: a worker that
//! is mid-sleep finishes its current cycle first, so the stop latency is bounded by
//! one scaled processing delay plus at most one backoff pause and the pacing pause.

use crate::system::cycle::SystemRunner;
use crate::system::entity::{System, SystemStatus};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Runs `system` until its status becomes [`SystemStatus::Terminate`].
pub fn run_worker(system: Arc<System>) {
    let name = system.name().to_string();
    let mut runner = SystemRunner::new(system);
    let mut cycles: u64 = 0;
    info!(system = %name, "Worker started");

    while runner.system().status() != SystemStatus::Terminate {
        let report = runner.run_cycle();
        cycles += 1;
        debug!(
            system = %name,
            cycle = cycles,
            convert = ?report.convert,
            store = ?report.store,
            pending = runner.amount_stored(),
            "Cycle done"
        );
    }

    info!(system = %name, cycles, pending = runner.amount_stored(), "Worker stopped");
}

/// Starts [`run_worker`] on a dedicated, named OS thread.
pub fn spawn_worker(system: Arc<System>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("system-{}", system.name()))
        .spawn(move || run_worker(system))
}
