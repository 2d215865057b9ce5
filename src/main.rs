use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use clap_complete::Shell;

use hostwatch::commands;

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print the report pages as JSON")
        .action(ArgAction::SetTrue)
}

fn timeout_arg() -> Arg {
    Arg::new("timeout")
        .long("timeout")
        .value_name("SECS")
        .help("Deadline for each diagnostic command")
        .value_parser(clap::value_parser!(u64))
}

fn threshold_args() -> [Arg; 2] {
    [
        Arg::new("warning")
            .short('w')
            .long("warning")
            .value_name("CELSIUS")
            .help("Warning temperature threshold")
            .value_parser(clap::value_parser!(f64)),
        Arg::new("critical")
            .short('c')
            .long("critical")
            .value_name("CELSIUS")
            .help("Critical temperature threshold")
            .value_parser(clap::value_parser!(f64)),
    ]
}

fn build_cli() -> Command {
    Command::new("hostwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Host telemetry: temperatures, ports and memory, with rate-limited alerts")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("temp")
                .about("Show hardware temperatures")
                .args(threshold_args())
                .arg(timeout_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("ports")
                .about("Show listening network ports")
                .arg(
                    Arg::new("all")
                        .short('a')
                        .long("all")
                        .help("Show all sockets, not only listening ones")
                        .action(ArgAction::SetTrue),
                )
                .arg(timeout_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("memory")
                .about("Show the top memory-consuming processes")
                .arg(timeout_arg())
                .arg(json_arg()),
        )
        .subcommand(Command::new("status").about("Show monitor configuration and alert destinations"))
        .subcommand(
            Command::new("alerts")
                .about("Manage alert destinations (use 'hostwatch alerts --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("enable")
                        .about("Send temperature alerts to a destination ('console' or a webhook URL)")
                        .arg(
                            Arg::new("destination")
                                .help("Destination to enable")
                                .required(true)
                                .index(1),
                        ),
                )
                .subcommand(
                    Command::new("disable")
                        .about("Stop sending temperature alerts to a destination")
                        .arg(
                            Arg::new("destination")
                                .help("Destination to disable")
                                .required(true)
                                .index(1),
                        ),
                )
                .subcommand(Command::new("list").about("List configured alert destinations")),
        )
        .subcommand(
            Command::new("watch")
                .about("Poll temperatures and memory continuously and dispatch alerts")
                .args(threshold_args())
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECS")
                        .help("Temperature poll interval")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("cooldown")
                        .long("cooldown")
                        .value_name("SECS")
                        .help("Minimum time between two alerts")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("destination")
                        .short('d')
                        .long("destination")
                        .value_name("DEST")
                        .help("Extra alert destination for this run (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(timeout_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .value_parser(clap::value_parser!(Shell))
                        .index(1),
                ),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}

fn main() -> Result<()> {
    hostwatch::init_logging();

    let matches = build_cli().get_matches();

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("temp", sub_matches)) => commands::temp::execute(sub_matches)?,
        Some(("ports", sub_matches)) => commands::ports::execute(sub_matches)?,
        Some(("memory", sub_matches)) => commands::memory::execute(sub_matches)?,
        Some(("status", sub_matches)) => commands::status::execute(sub_matches)?,
        Some(("alerts", sub_matches)) => commands::alerts::execute(sub_matches)?,
        Some(("watch", sub_matches)) => commands::watch::execute(sub_matches)?,
        Some(("completions", sub_matches)) => {
            let mut cli = build_cli();
            commands::completions::execute(sub_matches, &mut cli)?;
        }
        Some(("version", _)) => commands::version()?,
        _ => {
            println!("Welcome to hostwatch!");
            println!("Use 'hostwatch --help' for more information.");
        }
    }

    Ok(())
}
