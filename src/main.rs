use std::env;
use std::io;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use x88_chess::engines::engine_config::{EngineConfig, CONFIG_PATH_ENV};
use x88_chess::engines::engine_trait::Engine;
use x88_chess::engines::x88_engine::X88Engine;
use x88_chess::errors::ChessResult;
use x88_chess::uci::uci_top::run_stdio_loop;

fn main() -> ExitCode {
    // Stdout carries the protocol, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match build_engine() {
        Ok(engine) => match run_stdio_loop(engine) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!(%err, "protocol loop failed");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            error!(%err, "engine setup failed");
            ExitCode::FAILURE
        }
    }
}

fn build_engine() -> ChessResult<Box<dyn Engine>> {
    let config = match env::var_os(CONFIG_PATH_ENV) {
        Some(path) => EngineConfig::from_json_path(path)?,
        None => EngineConfig::default(),
    };
    let mut engine = X88Engine::new(config)?;
    engine.setup_engine()?;
    engine.setup_board();
    info!(name = engine.name(), "engine started");
    Ok(Box::new(engine))
}
