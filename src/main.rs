mod cli;
mod commands;
mod config;
mod error;
mod mcp;
mod page_range;
mod paginate;
mod sink;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use cli::{Cli, USAGE};
use config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => {
                    eprintln!("\n{}", USAGE);
                    ExitCode::from(1)
                }
            };
        }
    };

    if cli.mcp {
        return match mcp::run_server().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("selpg: {:#}", e);
                ExitCode::from(1)
            }
        };
    }

    match Config::from_cli(cli).and_then(|config| commands::select::run(&config)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("selpg: {}", e);
            eprintln!("\n{}", USAGE);
            ExitCode::from(1)
        }
    }
}
