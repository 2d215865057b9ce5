// UI and formatting module

pub mod printer;
pub mod report;

// Re-export commonly used items for cleaner imports
pub use printer::{dimmed, error, print_page, print_report, success, warn};
