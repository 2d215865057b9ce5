use chrono::{DateTime, Utc};

use crate::error::{HostwatchError, Result};
use crate::platform::executor::Executor;

use super::classifier::Thresholds;
use super::metrics::{PortEntry, ProcessMemoryEntry, TemperatureReading};
use super::parsers::{parse_ss_output, parse_sensors_output, parse_top_output};
use super::snapshot::{MemorySnapshot, SnapshotCache, SNAPSHOT_MAX_AGE};

const SENSORS: (&str, &[&str]) = ("sensors", &["-A", "-u"]);
const SS_LISTENING: (&str, &[&str]) = ("ss", &["-tulnp"]);
const SS_ALL: (&str, &[&str]) = ("ss", &["-tunap"]);
const TOP: (&str, &[&str]) = ("top", &["-b", "-n1", "-o", "%MEM"]);

/// Runs the diagnostic tools and turns their output into records
pub struct MetricsCollector<E> {
    executor: E,
    thresholds: Thresholds,
}

impl<E: Executor> MetricsCollector<E> {
    pub fn new(executor: E, thresholds: Thresholds) -> Self {
        Self {
            executor,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Classified readings, sorted by category then temperature
    pub async fn temperatures(&self) -> Result<Vec<TemperatureReading>> {
        let (program, args) = SENSORS;
        let output = self.executor.run(program, args).await?;
        let readings = parse_sensors_output(&output, &self.thresholds)?;
        if readings.is_empty() {
            return Err(HostwatchError::empty(
                "no temperature sensors found - run sensors-detect to configure lm-sensors",
            ));
        }
        log::debug!("Collected {} temperature readings", readings.len());
        Ok(readings)
    }

    /// Raw socket list, not yet deduplicated
    pub async fn ports(&self, show_all: bool) -> Result<Vec<PortEntry>> {
        let (program, args) = if show_all { SS_ALL } else { SS_LISTENING };
        let output = self.executor.run(program, args).await?;
        let ports = parse_ss_output(&output, show_all)?;
        if ports.is_empty() {
            return Err(HostwatchError::empty("no network ports found"));
        }
        Ok(ports)
    }

    /// Top processes by memory share
    pub async fn processes(&self) -> Result<Vec<ProcessMemoryEntry>> {
        let (program, args) = TOP;
        let output = self.executor.run(program, args).await?;
        let processes = parse_top_output(&output)?;
        if processes.is_empty() {
            return Err(HostwatchError::empty("no processes with memory usage found"));
        }
        Ok(processes)
    }

    /// Cached ranking when it is fresh enough, otherwise a new `top` run
    /// that also refreshes the cache
    pub async fn memory_snapshot(
        &self,
        cache: &SnapshotCache,
        now: DateTime<Utc>,
    ) -> Result<MemorySnapshot> {
        if let Some(snapshot) = cache.latest_fresh(SNAPSHOT_MAX_AGE, now) {
            log::debug!("Using cached memory snapshot from {}", snapshot.taken_at);
            return Ok(snapshot);
        }

        let processes = self.processes().await?;
        cache.store(processes.clone(), now);
        Ok(MemorySnapshot {
            processes,
            taken_at: now,
        })
    }
}
