//! Port deduplication and ordering, process ranking.

use std::collections::HashMap;

use super::metrics::{PortEntry, ProcessMemoryEntry};

/// Number of processes kept in a memory ranking
pub const TOP_PROCESSES: usize = 10;

type DedupKey = (String, String, String);

fn dedup_key(entry: &PortEntry) -> DedupKey {
    (
        entry.protocol.to_string().to_uppercase(),
        entry.address.trim().to_string(),
        entry.port.trim().to_string(),
    )
}

/// Collapse entries sharing (protocol, address, port).
///
/// The first occurrence keeps its position; a later duplicate only replaces
/// it when it carries a resolved process name and the kept one does not.
pub fn dedup_ports(ports: Vec<PortEntry>) -> Vec<PortEntry> {
    let mut index: HashMap<DedupKey, usize> = HashMap::with_capacity(ports.len());
    let mut unique: Vec<PortEntry> = Vec::with_capacity(ports.len());

    for entry in ports {
        let key = dedup_key(&entry);
        match index.get(&key) {
            Some(&pos) => {
                if entry.has_resolved_process() && !unique[pos].has_resolved_process() {
                    unique[pos] = entry;
                }
            }
            None => {
                index.insert(key, unique.len());
                unique.push(entry);
            }
        }
    }

    unique
}

/// Stable sort: TCP before UDP, then numeric port, unparsable ports last
pub fn sort_ports(ports: &mut [PortEntry]) {
    ports.sort_by_key(|entry| {
        let port_key = match entry.port.trim().parse::<u64>().ok() {
            Some(port) => (0u8, port),
            None => (1u8, 0),
        };
        (entry.protocol, port_key)
    });
}

/// Deduplicate and order a raw port list for display
pub fn dedup_and_sort_ports(ports: Vec<PortEntry>) -> Vec<PortEntry> {
    let mut unique = dedup_ports(ports);
    sort_ports(&mut unique);
    unique
}

/// Order by descending memory share and keep the top entries.
///
/// Ties keep parse order.
pub fn rank_processes(mut processes: Vec<ProcessMemoryEntry>) -> Vec<ProcessMemoryEntry> {
    processes.sort_by(|a, b| b.memory_percent.total_cmp(&a.memory_percent));
    processes.truncate(TOP_PROCESSES);
    processes
}
