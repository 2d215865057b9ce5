//! Top memory process report command.

use anyhow::Result;
use chrono::Utc;
use clap::ArgMatches;

use super::{block_on, load_config, output_report, reports};
use crate::core::system_monitor::{MetricsCollector, SnapshotCache};
use crate::platform::SystemExecutor;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let collector = MetricsCollector::new(
        SystemExecutor::new(config.command_timeout()),
        config.thresholds(),
    );
    // A one-shot run has no poll task filling the cache
    let cache = SnapshotCache::new();

    let report = block_on(reports::memory(&collector, &cache, Utc::now()))?;
    output_report(matches, &report)
}
