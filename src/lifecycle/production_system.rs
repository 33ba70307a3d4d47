use crate::clients::SystemClient;
use crate::event_queue::EventQueue;
use crate::lifecycle::config::{AmountConfig, ProductionConfig, SystemConfig};
use crate::lifecycle::consumer::{consume_events, EventHandler, EventSummary, LoggingHandler};
use crate::lifecycle::error::{ConfigError, LifecycleError};
use crate::model::{Registry, Resource, ResourceAmount, ResourceSnapshot};
use crate::system::{run_worker, System, SystemStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// What a finished run leaves behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownReport {
    pub events: EventSummary,
    pub resources: Vec<ResourceSnapshot>,
}

/// The runtime orchestrator for a production economy.
///
/// `ProductionSystem` is responsible for:
/// - **Construction**: Building every Resource and System described by a [`ProductionConfig`]
/// - **Workers**: One blocking-pool thread per System, running [`run_worker`]
/// - **Events**: A Tokio task draining the shared [`EventQueue`] into an [`EventHandler`]
/// - **Control**: A [`SystemClient`] per System to change its status while it runs
///
/// # Example
///
/// ```no_run
/// # use production_economy::lifecycle::{ProductionConfig, ProductionSystem};
/// # async fn demo() -> Result<(), production_economy::lifecycle::LifecycleError> {
/// let economy = ProductionSystem::new(&ProductionConfig::default())?;
///
/// if let Some(mine) = economy.system("mine") {
///     mine.speed_up();
/// }
/// tokio::time::sleep(std::time::Duration::from_secs(1)).await;
///
/// let report = economy.shutdown().await?;
/// println!("{} events", report.events.total);
/// # Ok(())
/// # }
/// ```
pub struct ProductionSystem {
    queue: Arc<EventQueue>,
    resources: Registry<Arc<Resource>>,
    systems: Registry<SystemClient>,
    workers: Vec<JoinHandle<()>>,
    stop_consumer: Option<oneshot::Sender<()>>,
    consumer: Option<JoinHandle<EventSummary>>,
}

impl ProductionSystem {
    /// Starts an economy whose events are logged by [`LoggingHandler`].
    pub fn new(config: &ProductionConfig) -> Result<Self, LifecycleError> {
        Self::start(config, Arc::new(LoggingHandler))
    }

    /// Builds and starts the economy described by `config`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// This method:
    /// 1. Validates the config
    /// 2. Creates every Resource, then every System against the shared queue
    /// 3. Applies each System's configured starting status
    /// 4. Spawns one worker per System and the event consumer
    ///
    /// # Errors
    /// - [`LifecycleError::Config`] if the config does not validate, including a
    ///   System that names a missing Resource
    /// - [`LifecycleError::Model`] if a Resource or System cannot be created
    pub fn start(
        config: &ProductionConfig,
        handler: Arc<dyn EventHandler>,
    ) -> Result<Self, LifecycleError> {
        config.validate()?;
        let queue = Arc::new(EventQueue::new());

        let mut resources = Registry::new();
        for rc in &config.resources {
            resources.add(Resource::create(&rc.name, rc.amount, rc.max_capacity)?)?;
        }

        let timing = config.timing.cycle_timing();
        let mut systems = Registry::new();
        for sc in &config.systems {
            let system = System::new(
                &sc.name,
                rule(&resources, sc, sc.consumes.as_ref())?,
                rule(&resources, sc, sc.produces.as_ref())?,
                sc.processing_time(),
                Arc::clone(&queue),
            )?
            .with_timing(timing);
            let client = SystemClient::new(Arc::new(system));
            if sc.status != SystemStatus::Standard {
                client.set_status(sc.status);
            }
            systems.add(client)?;
        }

        // Everything that can fail has been built; nothing below returns early.
        let workers = systems
            .iter()
            .map(|client| {
                let system = Arc::clone(client.system());
                tokio::task::spawn_blocking(move || run_worker(system))
            })
            .collect();

        let (stop_consumer, stopped) = oneshot::channel();
        let consumer = tokio::spawn(consume_events(
            Arc::clone(&queue),
            handler,
            config.timing.event_poll(),
            stopped,
        ));

        info!(
            resources = resources.len(),
            systems = systems.len(),
            "Production system started"
        );
        Ok(Self {
            queue,
            resources,
            systems,
            workers,
            stop_consumer: Some(stop_consumer),
            consumer: Some(consumer),
        })
    }

    pub fn resource(&self, name: &str) -> Option<&Arc<Resource>> {
        self.resources.iter().find(|r| r.name() == name)
    }

    pub fn system(&self, name: &str) -> Option<&SystemClient> {
        self.systems.iter().find(|s| s.name() == name)
    }

    pub fn systems(&self) -> impl Iterator<Item = &SystemClient> {
        self.systems.iter()
    }

    pub fn resources(&self) -> Vec<ResourceSnapshot> {
        self.resources.iter().map(|r| r.snapshot()).collect()
    }

    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    /// Gracefully stops the economy.
    ///
    /// This method:
    /// 1. Sets every System to `Terminate`
    /// 2. Waits for every worker to finish its current cycle and exit
    /// 3. Signals the consumer, which drains the remaining events
    /// 4. Snapshots the resources and releases both registries
    ///
    /// # Errors
    /// [`LifecycleError::WorkerFailed`] or [`LifecycleError::ConsumerFailed`] if a
    /// task panicked. The remaining tasks are still awaited first.
    pub async fn shutdown(mut self) -> Result<ShutdownReport, LifecycleError> {
        info!("Shutting down production system...");
        self.terminate_all();

        let mut failure = None;
        for handle in std::mem::take(&mut self.workers) {
            if let Err(e) = handle.await {
                error!("Worker task failed: {:?}", e);
                if failure.is_none() {
                    failure = Some(LifecycleError::WorkerFailed(e.to_string()));
                }
            }
        }

        if let Some(stop) = self.stop_consumer.take() {
            // A panicked consumer has dropped its receiver; the join below reports it.
            let _ = stop.send(());
        }
        let events = match self.consumer.take() {
            Some(consumer) => match consumer.await {
                Ok(summary) => summary,
                Err(e) => {
                    error!("Event consumer failed: {:?}", e);
                    return Err(
                        failure.unwrap_or(LifecycleError::ConsumerFailed(e.to_string()))
                    );
                }
            },
            None => EventSummary::default(),
        };
        if let Some(e) = failure {
            return Err(e);
        }

        let report = ShutdownReport {
            events,
            resources: self.resources(),
        };
        self.systems.clean();
        self.resources.clean();
        self.queue.clean();

        info!(events = report.events.total, "Production system shutdown complete.");
        Ok(report)
    }

    fn terminate_all(&self) {
        for client in &self.systems {
            client.terminate();
        }
    }
}

impl Drop for ProductionSystem {
    /// Terminates every System still registered, so workers stop even when
    /// [`shutdown`](Self::shutdown) is never called. Dropping the consumer's stop
    /// sender ends the consumer too.
    fn drop(&mut self) {
        self.terminate_all();
    }
}

/// Resolves one side of a System's rule against the built Resources.
fn rule(
    resources: &Registry<Arc<Resource>>,
    system: &SystemConfig,
    amount: Option<&AmountConfig>,
) -> Result<ResourceAmount, ConfigError> {
    let Some(amount) = amount else {
        return Ok(ResourceAmount::none());
    };
    resources
        .iter()
        .find(|r| r.name() == amount.resource)
        .map(|resource| ResourceAmount::new(Arc::clone(resource), amount.amount))
        .ok_or_else(|| {
            ConfigError::Invalid(format!(
                "system '{}' references unknown resource '{}'",
                system.name, amount.resource
            ))
        })
}
