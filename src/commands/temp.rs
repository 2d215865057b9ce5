//! Temperature report command.

use anyhow::Result;
use clap::ArgMatches;

use super::{block_on, load_config, output_report, reports};
use crate::core::system_monitor::MetricsCollector;
use crate::platform::SystemExecutor;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let collector = MetricsCollector::new(
        SystemExecutor::new(config.command_timeout()),
        config.thresholds(),
    );

    let report = block_on(reports::temperatures(&collector))?;
    output_report(matches, &report)
}
