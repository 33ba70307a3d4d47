//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG` (default `info`). Module paths are hidden (`with_target(false)`);
//! the structured fields name the System and Resource instead.
//!
//! ```bash
//! # Worker start/stop, status changes, every consumed event
//! RUST_LOG=info cargo run
//!
//! # Plus per-cycle outcomes and processing delays
//! RUST_LOG=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a short run reads:
//!
//! ```text
//! INFO Production system started resources=3 systems=3
//! INFO Worker started system=mine
//! WARN Input shortage system=forge resource="ingot" status=EMPTY amount=0
//! INFO Output backlog system=mine resource="ore" status=CAPACITY priority=1 amount=50
//! INFO Worker stopped system=mine cycles=14 pending=0
//! ```
use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
