use crate::config::{DurationLimit, LogFormat};
use anyhow::anyhow;
use clap::Parser;
use std::time::Duration;

/// Check whether a host is reachable with ICMP echo requests
#[derive(Parser, Debug)]
#[command(name = "pingcheck", author, version, about, long_about = None, arg_required_else_help(true))]
pub struct Args {
    /// The hostname or IPv4 address to check
    pub target: String,

    /// The reply timeout for each probe, 0 to wait indefinitely [default: 2s]
    #[arg(short = 't', long, value_parser = parse_duration_limit, allow_negative_numbers = true)]
    pub timeout: Option<DurationLimit>,

    /// The minimum spacing between the start of each probe, -1 for none [default: -1]
    #[arg(short = 'i', long, value_parser = parse_duration_limit, allow_negative_numbers = true)]
    pub interval: Option<DurationLimit>,

    /// The maximum number of probes, -1 for unlimited [default: -1]
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// The time budget for the whole check, -1 for unlimited [default: -1]
    #[arg(short = 'w', long, value_parser = parse_duration_limit, allow_negative_numbers = true)]
    pub deadline: Option<DurationLimit>,

    /// Probe without requiring elevated privileges on supported platforms [default: false]
    #[arg(short = 'u', long)]
    pub unprivileged: bool,

    /// Treat the first datagram received as the reply to the probe [default: false]
    #[arg(long)]
    pub accept_any_reply: bool,

    /// Do not send a last probe when the deadline is about to expire [default: false]
    #[arg(long)]
    pub no_final_probe: bool,

    /// The debug log format [default: compact]
    #[arg(value_enum, long)]
    pub log_format: Option<LogFormat>,

    /// The debug log filter [default: pingcheck=debug]
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Enable verbose debug logging
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

/// Parse a `humantime` duration where any negative number means unbounded.
fn parse_duration_limit(value: &str) -> anyhow::Result<DurationLimit> {
    if let Some(magnitude) = value.strip_prefix('-') {
        return if magnitude.parse::<u64>().is_ok() {
            Ok(DurationLimit::Unbounded)
        } else {
            Err(anyhow!("invalid negative duration: {value}"))
        };
    }
    Ok(DurationLimit::Bounded(parse_duration(value)?))
}

fn parse_duration(value: &str) -> anyhow::Result<Duration> {
    Ok(humantime::parse_duration(value)?)
}
