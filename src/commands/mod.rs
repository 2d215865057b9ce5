// Command handlers module
pub mod alerts;
pub mod completions;
pub mod memory;
pub mod ports;
pub mod reports;
pub mod status;
pub mod temp;
pub mod version;
pub mod watch;

use anyhow::{Context, Result};
use clap::ArgMatches;
use std::future::Future;

use crate::core::config::Config;
use crate::ui::report::Report;

// Re-exports for cleaner imports
pub use version::execute as version;

/// Load the config file and environment, then apply any threshold or
/// interval flags present on `matches`
pub(crate) fn load_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config::load()?;

    if let Ok(Some(&warning)) = matches.try_get_one::<f64>("warning") {
        config.warning_threshold = warning;
    }
    if let Ok(Some(&critical)) = matches.try_get_one::<f64>("critical") {
        config.critical_threshold = critical;
    }
    if let Ok(Some(&interval)) = matches.try_get_one::<u64>("interval") {
        config.poll_interval_secs = interval;
    }
    if let Ok(Some(&cooldown)) = matches.try_get_one::<u64>("cooldown") {
        config.alert_cooldown_secs = cooldown;
    }
    if let Ok(Some(&timeout)) = matches.try_get_one::<u64>("timeout") {
        config.command_timeout_secs = timeout;
    }
    if let Ok(Some(destinations)) = matches.try_get_many::<String>("destination") {
        for destination in destinations {
            config.add_destination(destination);
        }
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run a future to completion on a single-threaded runtime
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Print a report, as JSON when `--json` was given
pub(crate) fn output_report(matches: &ArgMatches, report: &Report) -> Result<()> {
    if matches.try_get_one::<bool>("json").ok().flatten().copied().unwrap_or(false) {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        crate::ui::print_report(report);
    }
    Ok(())
}
