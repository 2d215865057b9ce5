//! Monitor configuration summary.

use anyhow::Result;
use chrono::Utc;
use clap::ArgMatches;

use super::load_config;
use crate::ui::print_page;
use crate::ui::report::{status_page, PageBudget, StatusInfo};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let mut destinations = config.destinations.clone();
    destinations.sort();

    let info = StatusInfo {
        thresholds: config.thresholds(),
        poll_interval: config.poll_interval(),
        cooldown: config.alert_cooldown(),
        destinations,
        // Alert history lives only inside a running `watch`
        last_alert: None,
    };

    print_page(&status_page(&info, Utc::now(), &PageBudget::default()));
    println!();
    Ok(())
}
