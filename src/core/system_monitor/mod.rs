//! Host telemetry: tool output parsing, classification, ranking and alerting.

pub mod alerts;
mod classifier;
mod collector;
mod metrics;
pub mod parsers;
mod ranking;
pub mod runtime;
mod snapshot;
pub mod tasks;

pub use alerts::{
    assess, AlertCoordinator, AlertLevel, AlertState, BreachState, DestinationRegistry,
    DispatchOutcome,
};
pub use classifier::{categorize, readable_sensor_name, Thresholds};
pub use collector::MetricsCollector;
pub use metrics::{
    HardwareCategory, PortEntry, ProcessMemoryEntry, Protocol, TempStatus, TemperatureReading,
    UNKNOWN_PROCESS,
};
pub use parsers::{clean_command_name, parse_sensors_output, parse_ss_output, parse_top_output};
pub use ranking::{dedup_and_sort_ports, dedup_ports, rank_processes, sort_ports, TOP_PROCESSES};
pub use runtime::{local_host_name, spawn_poll_tasks, MonitorRuntime, MonitorSettings};
pub use snapshot::{MemorySnapshot, SnapshotCache, SNAPSHOT_MAX_AGE};
