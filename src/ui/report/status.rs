use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{PageBudget, ReportPage};
use crate::core::system_monitor::Thresholds;

/// Monitor settings and alert state shown by the status command
#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub thresholds: Thresholds,
    pub poll_interval: Duration,
    pub cooldown: Duration,
    pub destinations: Vec<String>,
    pub last_alert: Option<DateTime<Utc>>,
}

fn format_ago(elapsed: chrono::Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    match secs {
        0..=59 => format!("{}s ago", secs),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86399 => format!("{}h {}m ago", secs / 3600, (secs % 3600) / 60),
        _ => format!("{}d ago", secs / 86400),
    }
}

pub fn status_page(info: &StatusInfo, now: DateTime<Utc>, budget: &PageBudget) -> ReportPage {
    let last_alert = match info.last_alert {
        Some(at) => format!(
            "{} ({})",
            at.format("%Y-%m-%d %H:%M:%S UTC"),
            format_ago(now - at)
        ),
        None => "Never".to_string(),
    };

    let destinations = if info.destinations.is_empty() {
        "none".to_string()
    } else {
        info.destinations.join(", ")
    };

    let body = format!(
        "Warning threshold: {:.1}°C\nCritical threshold: {:.1}°C\nPoll interval: {}s\nAlert cooldown: {}s\nDestinations ({}): {}\nLast alert: {}",
        info.thresholds.warning,
        info.thresholds.critical,
        info.poll_interval.as_secs(),
        info.cooldown.as_secs(),
        info.destinations.len(),
        destinations,
        last_alert,
    );

    ReportPage::bounded("Temperature Monitor Status", &body, budget.max_body_bytes)
}
