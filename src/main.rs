use std::io;

use cal_board::storage::config::Config;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{CliMode, parse_cli_mode, run_agenda_mode};
mod tui;
use tui::{run_tui, check_setup};

#[tokio::main]
async fn main() -> Result<(), io::Error> {
    setup_logging();

    let cli_mode = match parse_cli_mode() {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", cli::usage());
            return Ok(());
        }
    };

    let (config, credential) = match check_setup() {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("Setup error: {}", e);
            tracing::error!("Setup failed: {}", e);
            return Ok(());
        }
    };

    match cli_mode {
        CliMode::Agenda => run_agenda_mode(config, credential).await,
        CliMode::Board => run_tui(config, credential).await,
    }
}

fn setup_logging() {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "cal-board.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("cal-board started");
}
