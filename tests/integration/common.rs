#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use hostwatch::core::delivery::DeliverySink;
use hostwatch::error::{HostwatchError, Result};
use hostwatch::platform::Executor;
use hostwatch::ui::report::ReportPage;
use parking_lot::Mutex;

pub const SENSORS_OUTPUT: &str = "\
coretemp-isa-0000
Adapter: ISA adapter
Package id 0:
  temp1_input: 72.000
  temp1_max: 80.000
Core 0:
  temp2_input: 65.000
Core 1:
  temp3_input: 85.000

nvme-pci-0100
Adapter: PCI adapter
Composite:
  temp1_input: 38.000
";

pub const COOL_SENSORS_OUTPUT: &str = "\
coretemp-isa-0000
Package id 0:
  temp1_input: 45.000
";

pub const SS_OUTPUT: &str = r#"Netid State  Recv-Q Send-Q Local Address:Port Peer Address:Port Process
tcp LISTEN 0 128 0.0.0.0:22 0.0.0.0:* users:(("sshd",pid=100,fd=3))
tcp LISTEN 0 128 127.0.0.1:22 0.0.0.0:* users:(("sshd",pid=100,fd=3))
tcp LISTEN 0 511 0.0.0.0:80 0.0.0.0:*
tcp LISTEN 0 511 0.0.0.0:80 0.0.0.0:* users:(("nginx",pid=77,fd=6))
"#;

pub const TOP_OUTPUT: &str = "\
top - 10:00:00 up 1 day,  2:03,  1 user,  load average: 0.10, 0.20, 0.30

    PID USER      PR  NI    VIRT    RES    SHR S  %CPU  %MEM     TIME+ COMMAND
   3100 alice     20   0 1000000 200000  50000 S   2.0   3.1   1:23.45 firefox
   4200 root      20   0       0      0      0 I   0.0   0.0   0:00.01 kworker/0:1
   1200 bob       20   0 1000000 200000  50000 S   7.5  25.0   9:23.45 /usr/bin/node server.js
";

/// Executor answering from canned command output
#[derive(Default)]
pub struct FakeExecutor {
    outputs: Mutex<HashMap<String, String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeExecutor {
    pub fn with(self, command: &str, output: &str) -> Self {
        self.set(command, output);
        self
    }

    pub fn set(&self, command: &str, output: &str) {
        self.outputs
            .lock()
            .insert(command.to_string(), output.to_string());
    }

    pub fn call_count(&self, command: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.as_str() == command).count()
    }
}

impl Executor for FakeExecutor {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let command = format!("{} {}", program, args.join(" "));
        self.calls.lock().push(command.clone());
        let output = self.outputs.lock().get(&command).cloned();
        output.ok_or_else(|| HostwatchError::tool_unavailable(program, None))
    }
}

/// Sink recording deliveries and rejecting a fixed set of destinations
#[derive(Default)]
pub struct RecordingSink {
    pub rejecting: HashSet<String>,
    pub delivered: Mutex<Vec<(String, ReportPage)>>,
}

impl RecordingSink {
    pub fn rejecting(destinations: &[&str]) -> Self {
        Self {
            rejecting: destinations.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        self.delivered.lock().len()
    }
}

impl DeliverySink for RecordingSink {
    async fn deliver(&self, destination: &str, page: &ReportPage) -> Result<()> {
        if self.rejecting.contains(destination) {
            return Err(HostwatchError::delivery_failed(destination, "channel gone"));
        }
        self.delivered
            .lock()
            .push((destination.to_string(), page.clone()));
        Ok(())
    }
}
