//! `sensors -A -u` output parser.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::system_monitor::classifier::{categorize, readable_sensor_name, Thresholds};
use crate::core::system_monitor::metrics::TemperatureReading;
use crate::error::Result;

static INPUT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)_input:\s+([+-]?[\d.]+)").expect("valid input regex"));
static LABEL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)_label:\s+(.+)").expect("valid label regex"));
static LOOSE_READING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z][\w .\-]*?):?\s+([+-]?\d+(?:\.\d+)?)\s*°C").expect("valid fallback regex")
});

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SensorKey {
    chip: String,
    key: String,
}

impl SensorKey {
    fn id(&self) -> String {
        format!("{}_{}", self.chip, self.key)
    }
}

struct SensorValue {
    temperature: f64,
    heading: Option<String>,
}

/// Parse temperature readings, classifying each one against `thresholds`.
///
/// Falls back to a loose `<name> <value>°C` scan when the structured `-u`
/// layout produced nothing. The result is sorted by category, hottest first
/// within each category.
pub fn parse_sensors_output(output: &str, thresholds: &Thresholds) -> Result<Vec<TemperatureReading>> {
    let mut readings = parse_structured(output, thresholds);

    if readings.is_empty() {
        log::warn!("No structured sensor data found, attempting fallback parsing");
        readings = parse_loose(output, thresholds);
        log::info!("Fallback parsing found {} sensors", readings.len());
    }

    sort_readings(&mut readings);
    Ok(readings)
}

fn is_temperature_key(key: &str) -> bool {
    key.contains("temp") || key.contains("Core")
}

fn parse_structured(output: &str, thresholds: &Thresholds) -> Vec<TemperatureReading> {
    let mut current_chip = String::new();
    let mut current_heading: Option<String> = None;
    let mut values: BTreeMap<SensorKey, SensorValue> = BTreeMap::new();
    let mut labels: BTreeMap<SensorKey, String> = BTreeMap::new();

    for raw in output.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if !line.contains(':') {
            log::debug!("Found chip: {}", line);
            current_chip = line.to_string();
            current_heading = None;
            continue;
        }

        if let Some(caps) = INPUT_LINE.captures(line) {
            let key = &caps[1];
            if is_temperature_key(key) {
                if let Ok(temperature) = caps[2].parse::<f64>() {
                    let sensor_key = SensorKey {
                        chip: current_chip.clone(),
                        key: key.to_string(),
                    };
                    log::debug!("Found temperature sensor {} = {}°C", sensor_key.id(), temperature);
                    values.insert(
                        sensor_key,
                        SensorValue {
                            temperature,
                            heading: current_heading.clone(),
                        },
                    );
                }
            }
            continue;
        }

        if let Some(caps) = LABEL_LINE.captures(line) {
            let key = &caps[1];
            if is_temperature_key(key) {
                let sensor_key = SensorKey {
                    chip: current_chip.clone(),
                    key: key.to_string(),
                };
                labels.insert(sensor_key, caps[2].trim().to_string());
            }
            continue;
        }

        // "Package id 0:" style feature heading
        if let Some(heading) = line.strip_suffix(':') {
            current_heading = Some(heading.trim().to_string());
        }
    }

    values
        .into_iter()
        .map(|(sensor_key, value)| {
            let label = labels
                .get(&sensor_key)
                .cloned()
                .or(value.heading)
                .unwrap_or_else(|| format!("{} {}", sensor_key.chip, sensor_key.key));
            let category = categorize(&format!("{} {}", sensor_key.chip, label));
            TemperatureReading::new(
                sensor_key.id(),
                readable_sensor_name(&label),
                value.temperature,
                category,
                thresholds,
            )
        })
        .collect()
}

fn parse_loose(output: &str, thresholds: &Thresholds) -> Vec<TemperatureReading> {
    let mut current_chip = String::new();
    let mut readings = Vec::new();

    for (line_num, raw) in output.lines().enumerate() {
        let line = raw.trim();
        if !line.is_empty() && !line.contains(':') && !line.contains("°C") {
            current_chip = line.to_string();
            continue;
        }

        let Some(caps) = LOOSE_READING.captures(line) else {
            continue;
        };
        let Ok(temperature) = caps[2].parse::<f64>() else {
            continue;
        };

        let name = caps[1].trim();
        let slug = name.to_lowercase().replace(' ', "_");
        let id = if current_chip.is_empty() {
            slug
        } else {
            format!("{}_{}", current_chip, slug)
        };
        log::debug!("Fallback found sensor at line {}: {} = {}°C", line_num + 1, name, temperature);

        readings.push(TemperatureReading::new(
            id,
            readable_sensor_name(name),
            temperature,
            categorize(&format!("{} {}", current_chip, name)),
            thresholds,
        ));
    }

    readings
}

fn sort_readings(readings: &mut [TemperatureReading]) {
    readings.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| b.temperature.total_cmp(&a.temperature))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::system_monitor::metrics::{HardwareCategory, TempStatus};

    const SENSORS_U: &str = "\
coretemp-isa-0000
Adapter: ISA adapter
Package id 0:
  temp1_input: 72.000
  temp1_max: 80.000
  temp1_crit: 100.000
Core 0:
  temp2_input: 65.000
  temp2_max: 80.000
Core 1:
  temp3_input: 85.000

nvme-pci-0100
Adapter: PCI adapter
Composite:
  temp1_input: 38.850
  temp1_max: 81.850
fan1:
  fan1_input: 1200.000
";

    #[test]
    fn test_structured_parse() {
        let readings = parse_sensors_output(SENSORS_U, &Thresholds::new(70.0, 80.0)).unwrap();
        assert_eq!(readings.len(), 4);

        // CPU first, hottest first
        assert_eq!(readings[0].name, "CPU Core 1");
        assert_eq!(readings[0].status(), TempStatus::Critical);
        assert_eq!(readings[1].name, "CPU Package");
        assert_eq!(readings[1].status(), TempStatus::Warning);
        assert_eq!(readings[2].name, "CPU Core 0");
        assert_eq!(readings[2].status(), TempStatus::Normal);

        assert_eq!(readings[3].category, HardwareCategory::Storage);
        assert_eq!(readings[3].name, "Composite");
        assert_eq!(readings[3].id, "nvme-pci-0100_temp1");
    }

    #[test]
    fn test_explicit_label_wins_over_heading() {
        let output = "\
acpitz-acpi-0
temp1:
  temp1_input: 41.000
  temp1_label: Board Zone
";
        let readings = parse_sensors_output(output, &Thresholds::default()).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].name, "Board Zone");
        assert_eq!(readings[0].category, HardwareCategory::System);
    }

    #[test]
    fn test_synthesized_label_without_heading() {
        let output = "\
mychip-virtual-0
temp1_input: 50.000
";
        let readings = parse_sensors_output(output, &Thresholds::default()).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].id, "mychip-virtual-0_temp1");
        assert_eq!(readings[0].name, "Mychip-virtual-0 Temp1");
    }

    #[test]
    fn test_fallback_on_plain_sensors_layout() {
        let output = "\
coretemp-isa-0000
Adapter: ISA adapter
Package id 0:  +45.0°C  (high = +80.0°C, crit = +100.0°C)
Core 0:        +43.0°C  (high = +80.0°C, crit = +100.0°C)
Core 1:        +91.5°C  (high = +80.0°C, crit = +100.0°C)
";
        let readings = parse_sensors_output(output, &Thresholds::new(70.0, 80.0)).unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].temperature, 91.5);
        assert_eq!(readings[0].name, "CPU Core 1");
        assert_eq!(readings[0].status(), TempStatus::Critical);
        assert!(readings.iter().all(|r| r.category == HardwareCategory::Cpu));
        assert_eq!(readings[2].id, "coretemp-isa-0000_core_0");
    }

    #[test]
    fn test_fallback_negative_value() {
        let output = "temp1: -5.0°C\n";
        let readings = parse_sensors_output(output, &Thresholds::default()).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].temperature, -5.0);
    }

    #[test]
    fn test_unrecognized_output_yields_nothing() {
        let readings = parse_sensors_output("No sensors found!\n", &Thresholds::default()).unwrap();
        assert!(readings.is_empty());
    }

    #[test]
    fn test_classification_independent_of_input_order() {
        let thresholds = Thresholds::new(70.0, 80.0);
        let forward = parse_sensors_output(SENSORS_U, &thresholds).unwrap();

        let mut reversed_blocks: Vec<&str> = SENSORS_U.split("\n\n").collect();
        reversed_blocks.reverse();
        let reversed = parse_sensors_output(&reversed_blocks.join("\n\n"), &thresholds).unwrap();

        assert_eq!(forward, reversed);
    }
}
