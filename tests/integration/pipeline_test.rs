use std::time::Duration;

use chrono::Utc;
use hostwatch::commands::reports;
use hostwatch::core::system_monitor::tasks::{run_memory_cycle, run_temperature_cycle};
use hostwatch::core::system_monitor::{
    AlertCoordinator, AlertLevel, DestinationRegistry, DispatchOutcome, MetricsCollector,
    SnapshotCache, Thresholds,
};

use super::common::*;

fn collector(executor: FakeExecutor) -> MetricsCollector<FakeExecutor> {
    MetricsCollector::new(executor, Thresholds::new(70.0, 80.0))
}

fn coordinator(destinations: &[&str]) -> AlertCoordinator {
    AlertCoordinator::new(
        Thresholds::new(70.0, 80.0),
        Duration::from_secs(300),
        destinations.iter().map(|d| d.to_string()),
    )
    .with_host("test-host")
}

#[tokio::test]
async fn test_temperature_report_end_to_end() {
    let collector = collector(FakeExecutor::default().with("sensors -A -u", SENSORS_OUTPUT));
    let report = reports::temperatures(&collector).await;

    assert_eq!(report.total, 4);
    let first_page: Vec<&str> = report.pages[0].body.lines().collect();
    assert_eq!(first_page[0], "[CRIT] CPU Core 1: 85.0°C");
    assert_eq!(first_page[1], "[WARN] CPU Package: 72.0°C");
    assert_eq!(first_page[2], "[ OK ] CPU Core 0: 65.0°C");
    assert_eq!(first_page[3], "[ OK ] Composite: 38.0°C");
    assert_eq!(report.pages.last().unwrap().title, "Hardware Overview (Critical)");
}

#[tokio::test]
async fn test_missing_tool_renders_error_page() {
    let collector = collector(FakeExecutor::default());
    let report = reports::temperatures(&collector).await;

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].title, "Error: Temperature check failed");
    assert!(report.pages[0].body.contains("sensors not installed"));
}

#[tokio::test]
async fn test_empty_sensor_output_renders_error_page() {
    let collector = collector(FakeExecutor::default().with("sensors -A -u", "\n"));
    let report = reports::temperatures(&collector).await;
    assert_eq!(report.pages.len(), 1);
    assert!(report.pages[0].body.contains("No data found"));
}

#[tokio::test]
async fn test_ports_report_dedups_and_keeps_distinct_addresses() {
    let collector = collector(FakeExecutor::default().with("ss -tulnp", SS_OUTPUT));
    let report = reports::ports(&collector, false).await;

    assert_eq!(report.total, 3);
    let lines: Vec<&str> = report.pages[0].body.lines().collect();
    assert_eq!(
        lines,
        vec![
            "TCP `0.0.0.0:22` SSH (pid 100)",
            "TCP `127.0.0.1:22` SSH (pid 100)",
            "TCP `0.0.0.0:80` Nginx (pid 77)",
        ]
    );
    let summary = &report.pages.last().unwrap().body;
    assert!(summary.contains("Original: 4 | Unique: 3 | TCP: 3 | UDP: 0"));
}

#[tokio::test]
async fn test_memory_cycle_feeds_on_demand_report() {
    let executor = FakeExecutor::default().with("top -b -n1 -o %MEM", TOP_OUTPUT);
    let collector = collector(executor);
    let cache = SnapshotCache::new();
    let now = Utc::now();

    let top_share = run_memory_cycle(&collector, &cache, now).await;
    assert_eq!(top_share, Some(25.0));

    let snapshot = cache.latest().unwrap();
    let shares: Vec<f64> = snapshot.processes.iter().map(|p| p.memory_percent).collect();
    assert_eq!(shares, vec![25.0, 3.1]);

    let report = reports::memory(&collector, &cache, now + chrono::Duration::seconds(5)).await;
    assert!(report.pages[0].body.starts_with("#1 [HIGH] Node.js | mem 25.0%"));
    // served from the snapshot, no second top run
    assert_eq!(collector.executor().call_count("top -b -n1 -o %MEM"), 1);
}

#[tokio::test]
async fn test_temperature_cycle_dispatches_and_prunes() {
    let collector = collector(FakeExecutor::default().with("sensors -A -u", SENSORS_OUTPUT));
    let alerts = coordinator(&["console", "https://hooks.example/dead"]);
    let sink = RecordingSink::rejecting(&["https://hooks.example/dead"]);

    let outcome = run_temperature_cycle(&collector, &alerts, &sink).await.unwrap();
    match outcome {
        DispatchOutcome::Dispatched { level, delivered, failed } => {
            assert_eq!(level, AlertLevel::Critical);
            assert_eq!(delivered, vec!["console".to_string()]);
            assert_eq!(failed.len(), 1);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(alerts.list_subscribed(), vec!["console".to_string()]);

    let delivered = sink.delivered.lock();
    assert_eq!(delivered[0].1.title, "CRITICAL Temperature Alert on test-host");
    assert!(delivered[0].1.body.contains("[CRIT] CPU Core 1: 85.0°C"));
    drop(delivered);

    let again = run_temperature_cycle(&collector, &alerts, &sink).await.unwrap();
    assert!(matches!(again, DispatchOutcome::SuppressedByCooldown { .. }));
    assert_eq!(sink.count(), 1);
}

#[tokio::test]
async fn test_cool_readings_and_failed_polls_do_not_alert() {
    let alerts = coordinator(&["console"]);
    let sink = RecordingSink::default();

    let cool = collector(FakeExecutor::default().with("sensors -A -u", COOL_SENSORS_OUTPUT));
    assert_eq!(
        run_temperature_cycle(&cool, &alerts, &sink).await,
        Some(DispatchOutcome::Idle)
    );

    let broken = collector(FakeExecutor::default());
    assert_eq!(run_temperature_cycle(&broken, &alerts, &sink).await, None);

    assert_eq!(alerts.last_alert(), None);
    assert_eq!(sink.count(), 0);
}
