//! Persistent alert destination management.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use colored::*;

use crate::core::config::Config;
use crate::core::delivery::is_supported_destination;
use crate::ui;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("enable", sub)) => enable(destination_arg(sub)?),
        Some(("disable", sub)) => disable(destination_arg(sub)?),
        Some(("list", _)) => list(),
        _ => {
            println!("Use 'hostwatch alerts --help' for more information.");
            Ok(())
        }
    }
}

fn destination_arg(matches: &ArgMatches) -> Result<&str> {
    matches
        .get_one::<String>("destination")
        .map(String::as_str)
        .context("destination argument is required")
}

fn enable(destination: &str) -> Result<()> {
    if !is_supported_destination(destination) {
        bail!(
            "Unsupported destination '{}': use 'console' or an http(s) webhook URL",
            destination
        );
    }

    let mut config = Config::load()?;
    if config.add_destination(destination) {
        config.save()?;
        ui::success(&format!("Temperature alerts enabled for {}", destination));
    } else {
        ui::warn(&format!("Alerts are already enabled for {}", destination));
    }
    Ok(())
}

fn disable(destination: &str) -> Result<()> {
    let mut config = Config::load()?;
    if config.remove_destination(destination) {
        config.save()?;
        ui::success(&format!("Temperature alerts disabled for {}", destination));
    } else {
        ui::warn(&format!("Alerts were not enabled for {}", destination));
    }
    Ok(())
}

fn list() -> Result<()> {
    let config = Config::load()?;
    if config.destinations.is_empty() {
        ui::dimmed("No alert destinations configured");
        return Ok(());
    }

    println!("{}", "Alert destinations:".bold());
    let mut destinations = config.destinations.clone();
    destinations.sort();
    for destination in destinations {
        println!("  {}", destination.cyan());
    }
    Ok(())
}
