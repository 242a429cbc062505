//! SlotInfo CLI - report the resources of the current batch job

use clap::Parser;
use slotinfo::config::{CliArgs, ProviderConfig};
use slotinfo::error::{Result, SlotInfoError};
use slotinfo::report::render;
use slotinfo::scheduler::ResourceInfoProvider;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = CliArgs::parse();

    // Initialize logging; stdout is reserved for the report
    let default_level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => {
            if let Some(message) = no_scheduler_message(&args) {
                eprintln!("{}", message);
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Collect and print the report; `Ok(false)` when no scheduler was found
fn run(args: &CliArgs) -> Result<bool> {
    let config = ProviderConfig::from_cli(args).map_err(SlotInfoError::config)?;
    let info = ResourceInfoProvider::new(config).collect();

    if !info.scheduler.is_known() {
        return Ok(false);
    }

    if !args.quiet {
        print!("{}", render(&info, args.format)?);
    }

    Ok(true)
}

/// Diagnostic for an environment without a scheduler; quiet mode leaves only the exit code
fn no_scheduler_message(args: &CliArgs) -> Option<&'static str> {
    (!args.quiet).then_some("Cannot determine scheduler")
}
