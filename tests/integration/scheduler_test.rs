use std::sync::Arc;
use std::time::Duration;

use hostwatch::core::system_monitor::{
    spawn_poll_tasks, AlertCoordinator, MetricsCollector, SnapshotCache, Thresholds,
};
use tokio::sync::broadcast;

use super::common::*;

#[tokio::test]
async fn test_poll_tasks_run_alert_once_and_stop_on_shutdown() {
    let executor = FakeExecutor::default()
        .with("sensors -A -u", SENSORS_OUTPUT)
        .with("top -b -n1 -o %MEM", TOP_OUTPUT);
    let collector = Arc::new(MetricsCollector::new(executor, Thresholds::new(70.0, 80.0)));
    let alerts = Arc::new(AlertCoordinator::new(
        Thresholds::new(70.0, 80.0),
        Duration::from_secs(300),
        vec!["console".to_string()],
    ));
    let sink = Arc::new(RecordingSink::default());
    let snapshots = Arc::new(SnapshotCache::new());
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let handles = spawn_poll_tasks(
        collector.clone(),
        alerts.clone(),
        sink.clone(),
        snapshots.clone(),
        Duration::from_millis(20),
        Duration::from_millis(20),
        &shutdown_tx,
    );

    tokio::time::sleep(Duration::from_millis(150)).await;

    // several temperature polls ran, but the cooldown allowed a single alert
    assert!(collector.executor().call_count("sensors -A -u") >= 2);
    assert_eq!(sink.count(), 1);
    assert!(alerts.last_alert().is_some());
    assert!(snapshots.latest().is_some());

    shutdown_tx.send(()).unwrap();
    for handle in handles {
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task did not stop after shutdown")
            .unwrap();
    }
}

#[tokio::test]
async fn test_failing_tools_do_not_stop_polling() {
    let collector = Arc::new(MetricsCollector::new(
        FakeExecutor::default(),
        Thresholds::default(),
    ));
    let alerts = Arc::new(AlertCoordinator::new(
        Thresholds::default(),
        Duration::from_secs(300),
        vec!["console".to_string()],
    ));
    let sink = Arc::new(RecordingSink::default());
    let snapshots = Arc::new(SnapshotCache::new());
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let handles = spawn_poll_tasks(
        collector.clone(),
        alerts,
        sink.clone(),
        snapshots.clone(),
        Duration::from_millis(20),
        Duration::from_millis(20),
        &shutdown_tx,
    );

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(collector.executor().call_count("sensors -A -u") >= 2);
    assert!(collector.executor().call_count("top -b -n1 -o %MEM") >= 2);
    assert_eq!(sink.count(), 0);
    assert!(snapshots.latest().is_none());

    shutdown_tx.send(()).unwrap();
    for handle in handles {
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task did not stop after shutdown")
            .unwrap();
    }
}
