use std::path::PathBuf;

use clap::Parser;
use tick::cli::commands::Cli;
use tick::cli::handlers;
use tick::io::{config_io, logging};
use tick::model::AppConfig;

fn main() {
    let code = run(Cli::parse());
    std::process::exit(code);
}

fn run(cli: Cli) -> i32 {
    let (data_dir, config) = match load_context(cli.data_dir.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };
    // Held until return so buffered log lines are flushed
    let _log_guard = match logging::init_logging(&data_dir, &config.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    let result = match cli.command {
        // No subcommand → launch TUI
        None => tick::tui::run(&data_dir, &config),
        Some(_) => handlers::dispatch(cli, &data_dir, &config),
    };
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            1
        }
    }
}

fn load_context(explicit: Option<&str>) -> Result<(PathBuf, AppConfig), config_io::ConfigError> {
    let data_dir = config_io::resolve_data_dir(explicit)?;
    let config = config_io::read_config(&data_dir)?;
    Ok((data_dir, config))
}
