//! Temperature poll and alert task.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::core::delivery::DeliverySink;
use crate::core::system_monitor::alerts::{AlertCoordinator, DispatchOutcome};
use crate::core::system_monitor::collector::MetricsCollector;
use crate::platform::executor::Executor;

/// One temperature cycle: collect, classify, maybe alert.
///
/// Returns `None` when collection failed and the cycle was skipped.
pub async fn run_temperature_cycle<E: Executor, S: DeliverySink>(
    collector: &MetricsCollector<E>,
    alerts: &AlertCoordinator,
    sink: &S,
) -> Option<DispatchOutcome> {
    match collector.temperatures().await {
        Ok(readings) => {
            let outcome = alerts.on_poll(&readings, sink, Utc::now()).await;
            log::debug!("Temperature cycle: {} readings, {:?}", readings.len(), outcome);
            Some(outcome)
        }
        Err(e) => {
            log::log!(super::skip_level(&e), "Temperature poll skipped: {}", e);
            None
        }
    }
}

pub async fn temperature_poll_task<E, S>(
    collector: Arc<MetricsCollector<E>>,
    alerts: Arc<AlertCoordinator>,
    sink: Arc<S>,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) where
    E: Executor + 'static,
    S: DeliverySink + 'static,
{
    log::info!("Temperature monitoring started (every {}s)", period.as_secs());

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_temperature_cycle(&collector, &alerts, sink.as_ref()).await;
            }
            _ = shutdown.recv() => {
                log::info!("Temperature task shutting down");
                break;
            }
        }
    }
}
