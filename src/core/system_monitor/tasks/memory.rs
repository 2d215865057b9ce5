//! Memory ranking poll task.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::core::system_monitor::collector::MetricsCollector;
use crate::core::system_monitor::snapshot::SnapshotCache;
use crate::platform::executor::Executor;

pub const MEMORY_POLL_INTERVAL: Duration = Duration::from_secs(5);

const HIGH_MEMORY_PERCENT: f64 = 20.0;
const ELEVATED_MEMORY_PERCENT: f64 = 10.0;

/// Refresh the snapshot cache and report the top process's memory share
pub async fn run_memory_cycle<E: Executor>(
    collector: &MetricsCollector<E>,
    cache: &SnapshotCache,
    now: DateTime<Utc>,
) -> Option<f64> {
    let processes = match collector.processes().await {
        Ok(processes) => processes,
        Err(e) => {
            log::log!(super::skip_level(&e), "Memory poll skipped: {}", e);
            return None;
        }
    };

    let top = processes.first().map(|p| (p.command.clone(), p.memory_percent));
    cache.store(processes, now);

    let (command, share) = top?;
    if share > HIGH_MEMORY_PERCENT {
        log::warn!("High memory usage: {} at {:.1}%", command, share);
    } else if share > ELEVATED_MEMORY_PERCENT {
        log::info!("Elevated memory usage: {} at {:.1}%", command, share);
    }
    Some(share)
}

pub async fn memory_poll_task<E>(
    collector: Arc<MetricsCollector<E>>,
    cache: Arc<SnapshotCache>,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) where
    E: Executor + 'static,
{
    log::info!("Memory monitoring started (every {}s)", period.as_secs());

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_memory_cycle(&collector, &cache, Utc::now()).await;
            }
            _ = shutdown.recv() => {
                log::info!("Memory task shutting down");
                break;
            }
        }
    }
}
