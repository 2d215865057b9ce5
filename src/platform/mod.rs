// Platform-specific code module

pub mod executor;

pub use executor::{Executor, SystemExecutor};
