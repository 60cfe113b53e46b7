use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use micro_user_server::config::Config;
use micro_user_server::logging;
use micro_user_server::server::{self, Server};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file; defaults are used if it doesn't exist.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("can't load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let max_level = match config.max_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(max_level, config.log_file.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    if !cli.config.exists() {
        warn!(path = %cli.config.display(), "config file not found, using defaults");
    }
    info!(
        host = %config.host,
        port = config.port,
        log_level = %config.log_level,
        log_file = ?config.log_file,
        base = %config.api_base_path,
        "configuration loaded"
    );

    let dispatcher = match micro_user_server::build_dispatcher(&config).await {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!(cause = %e, "can't initialize user storage");
            return ExitCode::FAILURE;
        }
    };

    match dispatcher.tokens().generate(1) {
        Ok(token) => info!(user_id = 1, %token, "test token"),
        Err(e) => warn!(cause = %e, "can't generate test token"),
    }

    let listener = match server::bind(config.address()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return ExitCode::FAILURE;
        }
    };

    Server::new(dispatcher).serve(listener).await;
    ExitCode::SUCCESS
}
