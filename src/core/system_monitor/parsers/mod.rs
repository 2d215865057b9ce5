//! Parsers for the text output of external diagnostic tools.
//!
//! Each parser is a plain function from raw text to typed records so the
//! pattern matching can be tested and swapped per tool version without
//! touching classification or rendering.

pub mod ports;
pub mod processes;
pub mod temperature;

pub use ports::parse_ss_output;
pub use processes::{clean_command_name, parse_top_output};
pub use temperature::parse_sensors_output;
