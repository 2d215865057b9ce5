//! Threshold and keyword classification for temperature sensors.
//!
//! Everything here is pure: the same label and value always classify the same
//! way, independent of the order readings are processed in.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::metrics::{HardwareCategory, TempStatus};

/// Warning and critical temperature thresholds (°C)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub warning: f64,
    pub critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: 70.0,
            critical: 80.0,
        }
    }
}

impl Thresholds {
    pub fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }

    pub fn status(&self, temperature: f64) -> TempStatus {
        if temperature >= self.critical {
            TempStatus::Critical
        } else if temperature >= self.warning {
            TempStatus::Warning
        } else {
            TempStatus::Normal
        }
    }
}

// Checked in order; the first category with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(HardwareCategory, &[&str])] = &[
    (
        HardwareCategory::Cpu,
        &["core", "package", "cpu", "peci", "tctl", "tdie", "k10temp"],
    ),
    (
        HardwareCategory::Gpu,
        &["gpu", "nouveau", "radeon", "amdgpu", "nvidia", "i915", "junction"],
    ),
    (
        HardwareCategory::Storage,
        &["nvme", "composite", "drivetemp", "ssd", "sata", "disk"],
    ),
    (
        HardwareCategory::WiFi,
        &["iwlwifi", "wifi", "wlan", "ath1", "mt7"],
    ),
    (HardwareCategory::Chipset, &["pch", "chipset"]),
    (
        HardwareCategory::Motherboard,
        &["systin", "auxtin", "motherboard", "vrm", "nct", "it87"],
    ),
    (HardwareCategory::System, &["acpitz", "thermal", "sys"]),
];

/// Map a free-text sensor label to a coarse hardware category
pub fn categorize(label: &str) -> HardwareCategory {
    let lower = label.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(HardwareCategory::Other)
}

static CORE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^core\s*(\d+)$").expect("valid core label regex"));

/// Turn a raw sensor label into something a person wants to read
pub fn readable_sensor_name(label: &str) -> String {
    let trimmed = label.trim();
    let lower = trimmed.to_lowercase();

    if lower.starts_with("package id") {
        return "CPU Package".to_string();
    }
    if let Some(caps) = CORE_LABEL.captures(trimmed) {
        return format!("CPU Core {}", &caps[1]);
    }

    title_case(&trimmed.replace('_', " "))
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
