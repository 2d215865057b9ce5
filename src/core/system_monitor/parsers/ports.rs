//! `ss -tulnp` / `ss -tunap` output parser.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::system_monitor::metrics::{PortEntry, Protocol, UNKNOWN_PROCESS};
use crate::error::Result;

static PROCESS_WITH_PID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\(\("([^"]+)",pid=(\d+)"#).expect("valid process regex"));
static QUOTED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)""#).expect("valid quoted name regex"));

const STATE_MARKERS: &[&str] = &[
    "LISTEN",
    "UNCONN",
    "ESTAB",
    "TIME-WAIT",
    "CLOSE-WAIT",
    "SYN-SENT",
    "SYN-RECV",
    "FIN-WAIT-1",
    "FIN-WAIT-2",
    "LAST-ACK",
    "CLOSING",
];

fn has_state_marker(token: &str) -> bool {
    STATE_MARKERS.iter().any(|marker| token.contains(marker))
}

fn is_listening(state: &str) -> bool {
    state.contains("LISTEN") || state.contains("UNCONN")
}

/// Parse socket summary lines into port entries.
///
/// With `show_all == false` only listening (TCP) and unconnected (UDP)
/// sockets are kept. Lines that cannot be understood are skipped.
pub fn parse_ss_output(output: &str, show_all: bool) -> Result<Vec<PortEntry>> {
    let mut ports = Vec::new();
    let mut skipped = 0usize;

    // First line is the column header
    for (index, line) in output.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            log::debug!("Skipping line {} - insufficient fields: {}", index + 1, fields.len());
            skipped += 1;
            continue;
        }

        let Some(protocol) = Protocol::from_netid(fields[0]) else {
            log::debug!("Skipping line {} - unknown protocol {}", index + 1, fields[0]);
            skipped += 1;
            continue;
        };

        let (state, address) = if fields.len() >= 5 {
            if has_state_marker(fields[1]) {
                (fields[1], fields[4])
            } else {
                (fields[1], fields[3])
            }
        } else {
            ("", fields[3])
        };

        if !show_all && !is_listening(state) {
            log::debug!("Skipping non-listening socket {} state {}", address, state);
            continue;
        }

        let (process_name, pid) = if fields.len() > 5 {
            let process_field = fields[fields.len() - 1];
            if process_field.contains("users:") {
                let (name, pid) = parse_process_field(process_field);
                (Some(name), pid)
            } else {
                (None, None)
            }
        } else {
            (None, None)
        };

        let port = address.rsplit(':').next().unwrap_or_default().to_string();

        ports.push(PortEntry {
            protocol,
            address: address.to_string(),
            port,
            state: state.to_string(),
            process_name,
            pid,
        });
    }

    log::debug!("Parsed {} sockets, skipped {} lines", ports.len(), skipped);
    Ok(ports)
}

/// Extract the process name and PID from a `users:((...))` field
fn parse_process_field(field: &str) -> (String, Option<u32>) {
    if let Some(caps) = PROCESS_WITH_PID.captures(field) {
        return (caps[1].to_string(), caps[2].parse().ok());
    }
    if let Some(caps) = QUOTED_NAME.captures(field) {
        return (caps[1].to_string(), None);
    }
    (UNKNOWN_PROCESS.to_string(), None)
}
