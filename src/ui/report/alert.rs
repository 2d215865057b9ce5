use chrono::{DateTime, Utc};

use super::{fit_to_budget, push_line_within, status_tag, PageBudget, ReportPage};
use crate::core::system_monitor::{AlertLevel, TemperatureReading, Thresholds};

const MAX_ALERT_SENSORS: usize = 15;

/// Single-page alert for a poll cycle that breached a threshold.
///
/// Breaching sensors are listed before normal ones; lines that would push
/// the body over budget are dropped.
pub fn alert_page(
    level: AlertLevel,
    readings: &[TemperatureReading],
    thresholds: &Thresholds,
    now: DateTime<Utc>,
    host: &str,
    budget: &PageBudget,
) -> ReportPage {
    let max_bytes = budget.max_body_bytes;
    let message = match level {
        AlertLevel::Critical => format!(
            "IMMEDIATE ACTION REQUIRED - temperature at or above {:.1}°C",
            thresholds.critical
        ),
        AlertLevel::Warning => format!(
            "Temperature elevated above {:.1}°C - monitor closely",
            thresholds.warning
        ),
    };

    let mut breaching: Vec<&TemperatureReading> =
        readings.iter().filter(|r| r.status().is_breach()).collect();
    breaching.sort_by(|a, b| b.temperature.total_cmp(&a.temperature));
    let normal: Vec<&TemperatureReading> =
        readings.iter().filter(|r| !r.status().is_breach()).collect();

    let mut body = fit_to_budget(&message, max_bytes);
    let footer = format!("Alert time: {}", now.format("%Y-%m-%d %H:%M:%S UTC"));
    let room = max_bytes.saturating_sub(footer.len() + 1);

    let line = |r: &TemperatureReading| {
        format!("{} {}: {:.1}°C", status_tag(r.status()), r.name, r.temperature)
    };

    let mut listed = 0usize;
    for (heading, group) in [("Breaching sensors:", &breaching), ("Normal sensors:", &normal)] {
        if group.is_empty() || listed >= MAX_ALERT_SENSORS {
            continue;
        }
        if !push_line_within(&mut body, heading, room) {
            break;
        }
        for reading in group.iter() {
            if listed >= MAX_ALERT_SENSORS || !push_line_within(&mut body, &line(*reading), room) {
                break;
            }
            listed += 1;
        }
    }

    push_line_within(&mut body, &footer, max_bytes);

    ReportPage::new(format!("{} Temperature Alert on {}", level, host), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::system_monitor::HardwareCategory;
    use chrono::TimeZone;

    fn readings(thresholds: &Thresholds) -> Vec<TemperatureReading> {
        vec![
            TemperatureReading::new("a", "CPU Core 0", 65.0, HardwareCategory::Cpu, thresholds),
            TemperatureReading::new("b", "CPU Package", 72.0, HardwareCategory::Cpu, thresholds),
            TemperatureReading::new("c", "CPU Core 1", 85.0, HardwareCategory::Cpu, thresholds),
        ]
    }

    #[test]
    fn test_alert_page_layout() {
        let thresholds = Thresholds::new(70.0, 80.0);
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let page = alert_page(
            AlertLevel::Critical,
            &readings(&thresholds),
            &thresholds,
            now,
            "box01",
            &PageBudget::default(),
        );

        assert_eq!(page.title, "CRITICAL Temperature Alert on box01");
        let lines: Vec<&str> = page.body.lines().collect();
        assert_eq!(
            lines,
            vec![
                "IMMEDIATE ACTION REQUIRED - temperature at or above 80.0°C",
                "Breaching sensors:",
                "[CRIT] CPU Core 1: 85.0°C",
                "[WARN] CPU Package: 72.0°C",
                "Normal sensors:",
                "[ OK ] CPU Core 0: 65.0°C",
                "Alert time: 2026-03-01 12:00:00 UTC",
            ]
        );
    }

    #[test]
    fn test_alert_page_caps_sensor_count_and_size() {
        let thresholds = Thresholds::new(70.0, 80.0);
        let many: Vec<TemperatureReading> = (0..40)
            .map(|i| {
                TemperatureReading::new(
                    format!("s{}", i),
                    format!("Sensor {}", i),
                    60.0 + i as f64,
                    HardwareCategory::Other,
                    &thresholds,
                )
            })
            .collect();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

        let page = alert_page(AlertLevel::Critical, &many, &thresholds, now, "h", &PageBudget::default());
        let sensor_lines = page.body.lines().filter(|l| l.contains("°C") && l.starts_with('[')).count();
        assert_eq!(sensor_lines, MAX_ALERT_SENSORS);
        assert!(page.body.ends_with("Alert time: 2026-03-01 12:00:00 UTC"));

        let tight = PageBudget { max_body_bytes: 200, ..PageBudget::default() };
        let page = alert_page(AlertLevel::Critical, &many, &thresholds, now, "h", &tight);
        assert!(page.body.len() <= 200);
        assert!(page.body.ends_with("Alert time: 2026-03-01 12:00:00 UTC"));
    }
}
