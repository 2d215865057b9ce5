//! `top -b -n1 -o %MEM` output parser.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::system_monitor::metrics::ProcessMemoryEntry;
use crate::core::system_monitor::ranking::rank_processes;
use crate::error::{HostwatchError, Result};

/// Rows collected before ranking; kept above the top-10 cut to tolerate ties
const MAX_COLLECTED_ROWS: usize = 15;

static PROCESS_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(\d+)\s+(\S+)\s+\S+\s+\S+\s+\S+\s+\S+\s+\S+\s+\S+\s+(\S+)\s+(\S+)\s+\S+\s+(.+)$",
    )
    .expect("valid process row regex")
});

/// Start offsets of the interesting columns in the header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    pub pid: usize,
    pub user: Option<usize>,
    pub cpu: Option<usize>,
    pub mem: usize,
    pub command: usize,
}

impl HeaderLayout {
    fn from_line(line: &str) -> Option<Self> {
        Some(Self {
            pid: line.find("PID")?,
            user: line.find("USER"),
            cpu: line.find("%CPU"),
            mem: line.find("%MEM")?,
            command: line.find("COMMAND")?,
        })
    }

    /// Whether %MEM is the first of the two percentage columns
    fn memory_first(&self) -> bool {
        match self.cpu {
            Some(cpu) => self.mem < cpu,
            None => false,
        }
    }
}

/// Parse the process table and return the top processes by memory share.
///
/// Fails only when no header line is found. Rows that do not match the
/// expected layout are skipped.
pub fn parse_top_output(output: &str) -> Result<Vec<ProcessMemoryEntry>> {
    let lines: Vec<&str> = output.lines().collect();

    let (header_index, layout) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| HeaderLayout::from_line(line).map(|layout| (i, layout)))
        .ok_or_else(|| HostwatchError::parse("invalid top output format - no header found"))?;

    log::debug!("Found header at line {}: {:?}", header_index + 1, layout);

    let memory_first = layout.memory_first();
    let mut processes = Vec::new();

    for line in &lines[header_index + 1..] {
        if processes.len() >= MAX_COLLECTED_ROWS {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = PROCESS_ROW.captures(line) else {
            log::debug!("Skipping unmatched line: {}", line);
            continue;
        };

        let (mem_raw, cpu_raw) = if memory_first {
            (&caps[3], &caps[4])
        } else {
            (&caps[4], &caps[3])
        };

        let Ok(pid) = caps[1].parse::<u32>() else {
            continue;
        };
        let Ok(memory_percent) = parse_percent(mem_raw) else {
            log::debug!("Could not parse memory percentage {} for PID {}", mem_raw, pid);
            continue;
        };
        let cpu_percent = parse_percent(cpu_raw).unwrap_or(0.0);

        if memory_percent == 0.0 {
            continue;
        }

        processes.push(ProcessMemoryEntry {
            pid,
            user: caps[2].to_string(),
            command: clean_command_name(caps[5].trim()),
            memory_percent,
            cpu_percent,
        });
    }

    Ok(rank_processes(processes))
}

// Some locales print a decimal comma
fn parse_percent(raw: &str) -> std::result::Result<f64, std::num::ParseFloatError> {
    raw.replace(',', ".").parse::<f64>()
}

const FRIENDLY_NAMES: &[(&str, &str)] = &[
    ("dockerd", "Docker Daemon"),
    ("containerd", "Container Runtime"),
    ("docker-proxy", "Docker Proxy"),
    ("nginx", "Nginx"),
    ("apache2", "Apache"),
    ("httpd", "Apache"),
    ("node", "Node.js"),
    ("mysql", "MySQL"),
    ("mysqld", "MySQL"),
    ("postgres", "PostgreSQL"),
    ("redis-server", "Redis"),
    ("mongod", "MongoDB"),
    ("systemd", "SystemD"),
    ("chrome", "Chrome"),
    ("firefox", "Firefox"),
    ("code", "VS Code"),
    ("gnome-shell", "GNOME Shell"),
    ("Xorg", "X Server"),
    ("pulseaudio", "PulseAudio"),
    ("NetworkManager", "Network Manager"),
];

/// Reduce a process-table command string to a short display name
pub fn clean_command_name(command: &str) -> String {
    let Some(first) = command.split_whitespace().next() else {
        return command.to_string();
    };

    // Kernel threads may contain '/' inside the brackets
    if first.len() > 2 && first.starts_with('[') && first.ends_with(']') {
        return first.trim_matches(|c| c == '[' || c == ']').to_string();
    }

    let base = first.rsplit('/').next().unwrap_or(first);

    FRIENDLY_NAMES
        .iter()
        .find(|(binary, _)| *binary == base)
        .map(|(_, friendly)| friendly.to_string())
        .unwrap_or_else(|| base.to_string())
}
