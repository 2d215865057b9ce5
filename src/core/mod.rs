// Core business logic module

pub mod config;
pub mod delivery;
pub mod system_monitor;

// Re-export commonly used items
pub use config::Config;
pub use delivery::{ConsoleSink, DeliverySink, RoutingSink, WebhookSink};
