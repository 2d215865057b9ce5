use super::{PageBudget, Paginator, Report, ReportPage};
use crate::core::system_monitor::{dedup_and_sort_ports, PortEntry, Protocol, UNKNOWN_PROCESS};

const MAX_LISTED_SERVICES: usize = 6;

// Substring match over the lower-cased process name, first hit wins
const SERVICE_ALIASES: &[(&str, &str)] = &[
    ("docker-proxy", "Docker"),
    ("dockerd", "Docker"),
    ("containerd", "Containerd"),
    ("nginx", "Nginx"),
    ("apache", "Apache"),
    ("httpd", "Apache"),
    ("node", "Node.js"),
    ("mysqld", "MySQL"),
    ("mariadb", "MySQL"),
    ("postgres", "PostgreSQL"),
    ("redis", "Redis"),
    ("mongod", "MongoDB"),
    ("sshd", "SSH"),
    ("systemd-resolve", "Resolved"),
    ("systemd", "Systemd"),
    ("dnsmasq", "DNSmasq"),
    ("dhclient", "DHCP"),
    ("dhcpcd", "DHCP"),
    ("cupsd", "CUPS"),
    ("avahi", "Avahi"),
    ("python", "Python"),
    ("java", "Java"),
];

const WELL_KNOWN_PORTS: &[(u16, &str)] = &[
    (21, "FTP"),
    (22, "SSH"),
    (25, "SMTP"),
    (53, "DNS"),
    (80, "HTTP"),
    (110, "POP3"),
    (143, "IMAP"),
    (443, "HTTPS"),
    (631, "IPP"),
    (993, "IMAPS"),
    (3000, "Dev Server"),
    (3306, "MySQL"),
    (5432, "PostgreSQL"),
    (6379, "Redis"),
    (8080, "HTTP-Alt"),
    (8443, "HTTPS-Alt"),
    (9090, "Prometheus"),
    (27017, "MongoDB"),
];

/// Short display name for a socket's owning process
pub fn shorten_process_name(name: Option<&str>) -> String {
    let name = match name {
        Some(n) if !n.is_empty() && n != UNKNOWN_PROCESS => n,
        _ => return "Unknown".to_string(),
    };

    let lower = name.to_lowercase();
    if let Some((_, alias)) = SERVICE_ALIASES.iter().find(|(key, _)| lower.contains(key)) {
        return alias.to_string();
    }

    if name.chars().count() > 15 {
        let head: String = name.chars().take(12).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

fn well_known_service(port: u16) -> Option<&'static str> {
    WELL_KNOWN_PORTS
        .iter()
        .find(|(p, _)| *p == port)
        .map(|(_, name)| *name)
}

fn format_entry(entry: &PortEntry, show_all: bool) -> String {
    let mut service = shorten_process_name(entry.process_name.as_deref());
    if let Some(pid) = entry.pid {
        service.push_str(&format!(" (pid {})", pid));
    }
    if show_all && !entry.state.is_empty() {
        format!("{} `{}` {} [{}]", entry.protocol, entry.address, service, entry.state)
    } else {
        format!("{} `{}` {}", entry.protocol, entry.address, service)
    }
}

/// Deduplicate, order and render a raw port list
pub fn ports_report(raw: Vec<PortEntry>, show_all: bool, budget: &PageBudget) -> Report {
    let original = raw.len();
    let unique = dedup_and_sort_ports(raw);
    let removed = original - unique.len();

    let title = if show_all {
        "All Network Connections"
    } else {
        "Listening Ports"
    };

    Paginator::new(title, budget)
        .empty_message("No network ports found")
        .paginate(
            &unique,
            |entry| format_entry(entry, show_all),
            summary(&unique, original, removed, show_all),
        )
}

fn summary(unique: &[PortEntry], original: usize, removed: usize, show_all: bool) -> ReportPage {
    let tcp = unique.iter().filter(|p| p.protocol == Protocol::Tcp).count();
    let udp = unique.len() - tcp;

    let description = match (show_all, removed) {
        (true, 0) => "All sockets".to_string(),
        (false, 0) => "Listening sockets".to_string(),
        (true, n) => format!("All sockets, {} duplicates removed", n),
        (false, n) => format!("Listening sockets, {} duplicates removed", n),
    };

    let mut services: Vec<String> = Vec::new();
    let mut seen: Vec<u16> = Vec::new();
    for port in unique.iter().filter_map(PortEntry::port_number) {
        if seen.contains(&port) {
            continue;
        }
        seen.push(port);
        if let Some(name) = well_known_service(port) {
            services.push(format!("{} ({})", name, port));
            if services.len() >= MAX_LISTED_SERVICES {
                break;
            }
        }
    }

    let mut body = format!(
        "{}\nOriginal: {} | Unique: {} | TCP: {} | UDP: {}",
        description,
        original,
        unique.len(),
        tcp,
        udp
    );
    if !services.is_empty() {
        body.push_str(&format!("\nServices: {}", services.join(" • ")));
    }

    ReportPage::new("Port Summary", body)
}
