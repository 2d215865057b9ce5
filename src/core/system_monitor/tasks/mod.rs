//! Periodic poll tasks.
//!
//! Each task owns a tokio interval and stops when the shutdown broadcast fires.
//! A failed cycle is logged and skipped; the next tick runs normally.

mod memory;
mod temperatures;

pub use memory::{memory_poll_task, run_memory_cycle, MEMORY_POLL_INTERVAL};
pub use temperatures::{run_temperature_cycle, temperature_poll_task};

use crate::error::HostwatchError;

/// Level for a skipped cycle: a missing or crashed tool is worth a warning,
/// an empty or unparsable result is not
pub(crate) fn skip_level(err: &HostwatchError) -> log::Level {
    if err.aborts_cycle() {
        log::Level::Warn
    } else {
        log::Level::Debug
    }
}
