#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::option_if_let_else,
    clippy::missing_const_for_fn,
    clippy::struct_excessive_bools,
    clippy::redundant_pub_crate
)]
#![forbid(unsafe_code)]

use crate::config::{Args, PingcheckConfig, EXIT_CONFIG_ERROR, EXIT_UNREACHABLE};
use clap::Parser;
use pingcheck_privilege::Privilege;
use std::process::ExitCode;

mod app;
mod config;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // help and version are printed to stdout and are not failures
            let status = if err.use_stderr() {
                ExitCode::from(EXIT_CONFIG_ERROR)
            } else {
                ExitCode::SUCCESS
            };
            let _ = err.print();
            return status;
        }
    };
    let cfg = match Privilege::discover()
        .map_err(anyhow::Error::from)
        .and_then(|privilege| PingcheckConfig::from(args, &privilege))
    {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };
    app::configure_logging(&cfg);
    match app::run_pingcheck(&cfg) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_UNREACHABLE),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}
