use std::collections::BTreeMap;

use super::{PageBudget, Paginator, Report, ReportPage};
use crate::core::system_monitor::{HardwareCategory, TempStatus, TemperatureReading, Thresholds};

pub fn status_tag(status: TempStatus) -> &'static str {
    match status {
        TempStatus::Critical => "[CRIT]",
        TempStatus::Warning => "[WARN]",
        TempStatus::Normal => "[ OK ]",
    }
}

/// Render temperature readings (already sorted by category) into pages
pub fn temperature_report(
    readings: &[TemperatureReading],
    thresholds: &Thresholds,
    budget: &PageBudget,
) -> Report {
    Paginator::new("System Hardware Temperatures", budget)
        .empty_message("No temperature sensors found")
        .paginate(
            readings,
            |r| format!("{} {}: {:.1}°C", status_tag(r.status()), r.name, r.temperature),
            overview(readings, thresholds),
        )
}

fn overview(readings: &[TemperatureReading], thresholds: &Thresholds) -> ReportPage {
    let Some(hottest) = readings
        .iter()
        .max_by(|a, b| a.temperature.total_cmp(&b.temperature))
    else {
        return ReportPage::new("Hardware Overview", "No temperature sensors found");
    };

    let mut max_per_category: BTreeMap<HardwareCategory, &TemperatureReading> = BTreeMap::new();
    for reading in readings {
        max_per_category
            .entry(reading.category)
            .and_modify(|current| {
                if reading.temperature > current.temperature {
                    *current = reading;
                }
            })
            .or_insert(reading);
    }

    let categories: Vec<String> = max_per_category
        .iter()
        .map(|(category, r)| format!("{}: {:.1}°C {}", category, r.temperature, status_tag(r.status())))
        .collect();

    let count = |status: TempStatus| readings.iter().filter(|r| r.status() == status).count();

    let body = format!(
        "Overall: {} (max {:.1}°C, {})\n{}\nSensors: {} ({} critical, {} warning, {} normal)\nThresholds: warning {:.1}°C | critical {:.1}°C",
        hottest.status(),
        hottest.temperature,
        hottest.name,
        categories.join(" | "),
        readings.len(),
        count(TempStatus::Critical),
        count(TempStatus::Warning),
        count(TempStatus::Normal),
        thresholds.warning,
        thresholds.critical,
    );

    ReportPage::new(format!("Hardware Overview ({})", hottest.status()), body)
}
