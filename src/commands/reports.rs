//! On-demand report handlers shared by the one-shot commands and the
//! interactive console of `watch`.
//!
//! Failures never propagate: they become a single error page so the caller
//! always has something to show.

use chrono::{DateTime, Utc};

use crate::core::system_monitor::{MetricsCollector, SnapshotCache};
use crate::error::HostwatchError;
use crate::platform::executor::Executor;
use crate::ui::report::{
    memory_report, ports_report, temperature_report, PageBudget, Report, ReportPage,
};

fn error_report(title: &str, err: &HostwatchError) -> Report {
    log::warn!("{}: {}", title, err);
    Report::single(ReportPage::error(title, err))
}

pub async fn temperatures<E: Executor>(collector: &MetricsCollector<E>) -> Report {
    match collector.temperatures().await {
        Ok(readings) => {
            temperature_report(&readings, collector.thresholds(), &PageBudget::default())
        }
        Err(e) => error_report("Temperature check failed", &e),
    }
}

pub async fn ports<E: Executor>(collector: &MetricsCollector<E>, show_all: bool) -> Report {
    match collector.ports(show_all).await {
        Ok(raw) => ports_report(raw, show_all, &PageBudget::ports()),
        Err(e) => error_report("Port scan failed", &e),
    }
}

/// Memory ranking, served from `cache` when it is fresh enough
pub async fn memory<E: Executor>(
    collector: &MetricsCollector<E>,
    cache: &SnapshotCache,
    now: DateTime<Utc>,
) -> Report {
    match collector.memory_snapshot(cache, now).await {
        Ok(snapshot) => memory_report(&snapshot.processes, snapshot.taken_at, &PageBudget::default()),
        Err(e) => error_report("Memory check failed", &e),
    }
}
