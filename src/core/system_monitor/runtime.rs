//! Tokio runtime that owns the poll tasks and the shared monitor state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::alerts::{AlertCoordinator, DestinationRegistry};
use super::classifier::Thresholds;
use super::collector::MetricsCollector;
use super::snapshot::SnapshotCache;
use super::tasks::{memory_poll_task, temperature_poll_task, MEMORY_POLL_INTERVAL};
use crate::core::config::Config;
use crate::core::delivery::{DeliverySink, RoutingSink};
use crate::platform::executor::{Executor, SystemExecutor};
use crate::ui::report::StatusInfo;

/// Everything the monitor needs from configuration
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub thresholds: Thresholds,
    pub poll_interval: Duration,
    pub cooldown: Duration,
    pub command_timeout: Duration,
    pub destinations: Vec<String>,
    pub host: String,
}

impl MonitorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            thresholds: config.thresholds(),
            poll_interval: config.poll_interval(),
            cooldown: config.alert_cooldown(),
            command_timeout: config.command_timeout(),
            destinations: config.destinations.clone(),
            host: local_host_name(),
        }
    }
}

pub fn local_host_name() -> String {
    sysinfo::System::host_name().unwrap_or_else(|| "unknown host".to_string())
}

/// Spawn the temperature and memory poll tasks on the current runtime
pub fn spawn_poll_tasks<E, S>(
    collector: Arc<MetricsCollector<E>>,
    alerts: Arc<AlertCoordinator>,
    sink: Arc<S>,
    snapshots: Arc<SnapshotCache>,
    poll_interval: Duration,
    memory_interval: Duration,
    shutdown: &broadcast::Sender<()>,
) -> Vec<JoinHandle<()>>
where
    E: Executor + 'static,
    S: DeliverySink + 'static,
{
    vec![
        tokio::spawn(temperature_poll_task(
            collector.clone(),
            alerts,
            sink,
            poll_interval,
            shutdown.subscribe(),
        )),
        tokio::spawn(memory_poll_task(
            collector,
            snapshots,
            memory_interval,
            shutdown.subscribe(),
        )),
    ]
}

/// Background monitor used by `watch`.
///
/// On-demand commands run through [`MonitorRuntime::block_on`] and share the
/// collector, alert state and memory snapshot with the poll tasks.
pub struct MonitorRuntime {
    pub collector: Arc<MetricsCollector<SystemExecutor>>,
    pub alerts: Arc<AlertCoordinator>,
    pub snapshots: Arc<SnapshotCache>,
    poll_interval: Duration,
    shutdown_tx: broadcast::Sender<()>,
    runtime: tokio::runtime::Runtime,
}

impl MonitorRuntime {
    pub fn new(settings: MonitorSettings) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("hostwatch-worker")
            .build()?;

        let collector = Arc::new(MetricsCollector::new(
            SystemExecutor::new(settings.command_timeout),
            settings.thresholds,
        ));
        let alerts = Arc::new(
            AlertCoordinator::new(settings.thresholds, settings.cooldown, settings.destinations)
                .with_host(settings.host),
        );
        let snapshots = Arc::new(SnapshotCache::new());
        let sink = Arc::new(RoutingSink::new(settings.command_timeout)?);
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        {
            let _guard = runtime.enter();
            spawn_poll_tasks(
                collector.clone(),
                alerts.clone(),
                sink,
                snapshots.clone(),
                settings.poll_interval,
                MEMORY_POLL_INTERVAL,
                &shutdown_tx,
            );
        }

        log::info!(
            "Monitor started: warning {:.1}°C, critical {:.1}°C, {} destination(s)",
            settings.thresholds.warning,
            settings.thresholds.critical,
            alerts.list_subscribed().len()
        );

        Ok(Self {
            collector,
            alerts,
            snapshots,
            poll_interval: settings.poll_interval,
            shutdown_tx,
            runtime,
        })
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Sender that stops the poll tasks when fired
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    pub fn status(&self) -> StatusInfo {
        StatusInfo {
            thresholds: *self.alerts.thresholds(),
            poll_interval: self.poll_interval,
            cooldown: self.alerts.cooldown(),
            destinations: self.alerts.list_subscribed(),
            last_alert: self.alerts.last_alert(),
        }
    }

    pub fn shutdown(self) {
        log::info!("Shutting down monitor");
        let _ = self.shutdown_tx.send(());
        self.runtime.shutdown_timeout(Duration::from_secs(2));
    }
}
