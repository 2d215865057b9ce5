use serde::{Deserialize, Serialize};
use std::fmt;

use super::classifier::Thresholds;

/// Three-level temperature status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TempStatus {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl TempStatus {
    pub fn is_breach(&self) -> bool {
        !matches!(self, TempStatus::Normal)
    }
}

impl fmt::Display for TempStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TempStatus::Normal => "Normal",
            TempStatus::Warning => "Warning",
            TempStatus::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// Hardware category of a temperature sensor.
///
/// Declaration order is the display and sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HardwareCategory {
    Cpu,
    Gpu,
    Motherboard,
    Chipset,
    WiFi,
    Storage,
    System,
    #[default]
    Other,
}

impl HardwareCategory {
    pub const ALL: [HardwareCategory; 8] = [
        HardwareCategory::Cpu,
        HardwareCategory::Gpu,
        HardwareCategory::Motherboard,
        HardwareCategory::Chipset,
        HardwareCategory::WiFi,
        HardwareCategory::Storage,
        HardwareCategory::System,
        HardwareCategory::Other,
    ];
}

impl fmt::Display for HardwareCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HardwareCategory::Cpu => "CPU",
            HardwareCategory::Gpu => "GPU",
            HardwareCategory::Motherboard => "Motherboard",
            HardwareCategory::Chipset => "Chipset",
            HardwareCategory::WiFi => "WiFi",
            HardwareCategory::Storage => "Storage",
            HardwareCategory::System => "System",
            HardwareCategory::Other => "Other",
        };
        f.write_str(s)
    }
}

/// One temperature sensor reading from a single poll cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub id: String,
    pub name: String,
    pub temperature: f64,
    pub category: HardwareCategory,
    status: TempStatus,
}

impl TemperatureReading {
    /// Build a reading; the status is always derived from `thresholds`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        temperature: f64,
        category: HardwareCategory,
        thresholds: &Thresholds,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            temperature,
            category,
            status: thresholds.status(temperature),
        }
    }

    pub fn status(&self) -> TempStatus {
        self.status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// Parse the `Netid` column of `ss` output
    pub fn from_netid(netid: &str) -> Option<Self> {
        match netid.to_lowercase().as_str() {
            "tcp" | "tcp6" => Some(Protocol::Tcp),
            "udp" | "udp6" => Some(Protocol::Udp),
            _ => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => f.write_str("TCP"),
            Protocol::Udp => f.write_str("UDP"),
        }
    }
}

/// Name recorded when `ss` shows a process field that could not be parsed
pub const UNKNOWN_PROCESS: &str = "unknown";

/// A listening or connected socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortEntry {
    pub protocol: Protocol,
    pub address: String,
    pub port: String,
    pub state: String,
    pub process_name: Option<String>,
    pub pid: Option<u32>,
}

impl PortEntry {
    pub fn has_resolved_process(&self) -> bool {
        self.process_name
            .as_deref()
            .is_some_and(|name| !name.is_empty() && name != UNKNOWN_PROCESS)
    }

    pub fn port_number(&self) -> Option<u16> {
        self.port.trim().parse().ok()
    }
}

/// A process ranked by memory share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMemoryEntry {
    pub pid: u32,
    pub user: String,
    pub command: String,
    pub memory_percent: f64,
    pub cpu_percent: f64,
}
