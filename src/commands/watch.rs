//! Continuous monitoring with an interactive console.
//!
//! Poll tasks run in the background while stdin accepts on-demand commands.
//! Ctrl+C or `quit` stops everything.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::ArgMatches;
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use super::{load_config, reports};
use crate::core::delivery::is_supported_destination;
use crate::core::system_monitor::{DestinationRegistry, MonitorRuntime, MonitorSettings};
use crate::ui;
use crate::ui::report::{status_page, PageBudget};

/// A line typed into the watch console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Temp,
    Ports { show_all: bool },
    Memory,
    Status,
    EnableAlerts(String),
    DisableAlerts(String),
    Help,
    Quit,
}

impl ConsoleCommand {
    /// `Ok(None)` for a blank line, `Err` with a usage hint for bad input
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Ok(None);
        };

        let command = match first.trim_start_matches('/').to_lowercase().as_str() {
            "temp" | "temps" | "temperature" => ConsoleCommand::Temp,
            "ports" => ConsoleCommand::Ports {
                show_all: matches!(words.next(), Some("all" | "--all")),
            },
            "memory" | "mem" => ConsoleCommand::Memory,
            "status" => ConsoleCommand::Status,
            "alerts" => match (words.next(), words.next()) {
                (Some("enable"), Some(destination)) => {
                    ConsoleCommand::EnableAlerts(destination.to_string())
                }
                (Some("disable"), Some(destination)) => {
                    ConsoleCommand::DisableAlerts(destination.to_string())
                }
                _ => return Err("usage: alerts <enable|disable> <destination>".to_string()),
            },
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            other => return Err(format!("unknown command '{}', type 'help'", other)),
        };
        Ok(Some(command))
    }
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    for destination in &config.destinations {
        if !is_supported_destination(destination) {
            ui::warn(&format!(
                "Destination '{}' is not deliverable and will be dropped on the first alert",
                destination
            ));
        }
    }

    let runtime = MonitorRuntime::new(MonitorSettings::from_config(&config))
        .context("Failed to start monitor")?;

    let shutdown = runtime.shutdown_handle();
    let ctrlc_shutdown = shutdown.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("{}", "Stopping monitor...".yellow().bold());
        let _ = ctrlc_shutdown.send(());
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    println!(
        "{}",
        format!(
            "Watching temperatures every {}s (warning {:.1}°C, critical {:.1}°C)",
            config.poll_interval_secs, config.warning_threshold, config.critical_threshold
        )
        .cyan()
        .bold()
    );
    println!("{}", "Type 'help' for commands, Ctrl+C to stop".dimmed());

    let result = runtime.block_on(console_loop(&runtime, shutdown.subscribe()));
    runtime.shutdown();
    result
}

async fn console_loop(runtime: &MonitorRuntime, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read console input")?,
            _ = shutdown.recv() => break,
        };

        let Some(line) = line else {
            // stdin closed (e.g. running under a service manager): keep polling
            let _ = shutdown.recv().await;
            break;
        };

        match ConsoleCommand::parse(&line) {
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(command)) => handle(runtime, command).await,
            Ok(None) => {}
            Err(message) => ui::error(&message),
        }
    }
    Ok(())
}

async fn handle(runtime: &MonitorRuntime, command: ConsoleCommand) {
    match command {
        ConsoleCommand::Temp => ui::print_report(&reports::temperatures(&runtime.collector).await),
        ConsoleCommand::Ports { show_all } => {
            ui::print_report(&reports::ports(&runtime.collector, show_all).await)
        }
        ConsoleCommand::Memory => ui::print_report(
            &reports::memory(&runtime.collector, &runtime.snapshots, Utc::now()).await,
        ),
        ConsoleCommand::Status => {
            ui::print_page(&status_page(&runtime.status(), Utc::now(), &PageBudget::default()))
        }
        ConsoleCommand::EnableAlerts(destination) => {
            if !is_supported_destination(&destination) {
                ui::error(&format!(
                    "Unsupported destination '{}': use 'console' or an http(s) webhook URL",
                    destination
                ));
            } else if runtime.alerts.subscribe(&destination) {
                ui::success(&format!("Temperature alerts enabled for {}", destination));
            } else {
                ui::warn(&format!("Alerts are already enabled for {}", destination));
            }
        }
        ConsoleCommand::DisableAlerts(destination) => {
            if runtime.alerts.unsubscribe(&destination) {
                ui::success(&format!("Temperature alerts disabled for {}", destination));
            } else {
                ui::warn(&format!("Alerts were not enabled for {}", destination));
            }
        }
        ConsoleCommand::Help => print_help(),
        ConsoleCommand::Quit => {}
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {}                         hardware temperatures", "temp".cyan());
    println!("  {}                  listening ports (all sockets with 'all')", "ports [all]".cyan());
    println!("  {}                       top memory processes", "memory".cyan());
    println!("  {}                       monitor settings and last alert", "status".cyan());
    println!("  {}  manage alert destinations", "alerts <enable|disable> <dest>".cyan());
    println!("  {}                         stop monitoring", "quit".cyan());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleCommand::parse("temp"), Ok(Some(ConsoleCommand::Temp)));
        assert_eq!(ConsoleCommand::parse("  /TEMP "), Ok(Some(ConsoleCommand::Temp)));
        assert_eq!(
            ConsoleCommand::parse("ports all"),
            Ok(Some(ConsoleCommand::Ports { show_all: true }))
        );
        assert_eq!(
            ConsoleCommand::parse("ports"),
            Ok(Some(ConsoleCommand::Ports { show_all: false }))
        );
        assert_eq!(ConsoleCommand::parse("mem"), Ok(Some(ConsoleCommand::Memory)));
        assert_eq!(ConsoleCommand::parse("q"), Ok(Some(ConsoleCommand::Quit)));
        assert_eq!(ConsoleCommand::parse("   "), Ok(None));
    }

    #[test]
    fn test_parse_alert_commands() {
        assert_eq!(
            ConsoleCommand::parse("alerts enable https://hooks.example/x"),
            Ok(Some(ConsoleCommand::EnableAlerts("https://hooks.example/x".to_string())))
        );
        assert_eq!(
            ConsoleCommand::parse("alerts disable console"),
            Ok(Some(ConsoleCommand::DisableAlerts("console".to_string())))
        );
        assert!(ConsoleCommand::parse("alerts enable").is_err());
        assert!(ConsoleCommand::parse("alerts toggle console").is_err());
    }

    #[test]
    fn test_parse_unknown() {
        let err = ConsoleCommand::parse("reboot").unwrap_err();
        assert!(err.contains("unknown command 'reboot'"));
    }
}
