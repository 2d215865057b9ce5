use chrono::{DateTime, Utc};

use super::{PageBudget, Paginator, Report, ReportPage};
use crate::core::system_monitor::ProcessMemoryEntry;

fn usage_tier(memory_percent: f64) -> &'static str {
    if memory_percent >= 10.0 {
        "[HIGH]"
    } else if memory_percent >= 5.0 {
        "[MED]"
    } else if memory_percent >= 1.0 {
        "[LOW]"
    } else {
        "[MIN]"
    }
}

/// Render a ranked process list captured at `taken_at`
pub fn memory_report(
    processes: &[ProcessMemoryEntry],
    taken_at: DateTime<Utc>,
    budget: &PageBudget,
) -> Report {
    let ranked: Vec<(usize, &ProcessMemoryEntry)> =
        processes.iter().enumerate().map(|(i, p)| (i + 1, p)).collect();

    Paginator::new("Top Memory Processes", budget)
        .empty_message("No processes found")
        .paginate(
            &ranked,
            |(rank, p)| {
                format!(
                    "#{} {} {} | mem {:.1}% | cpu {:.1}% | user {} | pid {}",
                    rank,
                    usage_tier(p.memory_percent),
                    p.command,
                    p.memory_percent,
                    p.cpu_percent,
                    p.user,
                    p.pid
                )
            },
            summary(processes, taken_at),
        )
}

fn summary(processes: &[ProcessMemoryEntry], taken_at: DateTime<Utc>) -> ReportPage {
    let updated = format!("Updated: {}", taken_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let Some(top) = processes.first() else {
        return ReportPage::new("Memory Summary", format!("No processes found\n{}", updated));
    };

    let total: f64 = processes.iter().map(|p| p.memory_percent).sum();
    let average = total / processes.len() as f64;

    ReportPage::new(
        "Memory Summary",
        format!(
            "Top {} processes using {:.1}% of memory\nHighest: {} ({:.1}%)\nAverage: {:.1}%\n{}",
            processes.len(),
            total,
            top.command,
            top.memory_percent,
            average,
            updated
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(pid: u32, command: &str, mem: f64, cpu: f64) -> ProcessMemoryEntry {
        ProcessMemoryEntry {
            pid,
            user: "bob".to_string(),
            command: command.to_string(),
            memory_percent: mem,
            cpu_percent: cpu,
        }
    }

    #[test]
    fn test_memory_report() {
        let taken_at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap();
        let processes = vec![entry(1200, "Node.js", 12.5, 7.5), entry(3100, "Firefox", 3.5, 2.0)];
        let report = memory_report(&processes, taken_at, &PageBudget::default());

        let lines: Vec<&str> = report.pages[0].body.lines().collect();
        assert_eq!(
            lines[0],
            "#1 [HIGH] Node.js | mem 12.5% | cpu 7.5% | user bob | pid 1200"
        );
        assert!(lines[1].starts_with("#2 [LOW] Firefox"));

        let summary = &report.pages[1].body;
        assert!(summary.contains("Top 2 processes using 16.0% of memory"));
        assert!(summary.contains("Highest: Node.js (12.5%)"));
        assert!(summary.contains("Average: 8.0%"));
        assert!(summary.contains("Updated: 2026-03-01 08:30:00 UTC"));
    }

    #[test]
    fn test_usage_tiers() {
        assert_eq!(usage_tier(10.0), "[HIGH]");
        assert_eq!(usage_tier(5.0), "[MED]");
        assert_eq!(usage_tier(1.0), "[LOW]");
        assert_eq!(usage_tier(0.4), "[MIN]");
    }
}
