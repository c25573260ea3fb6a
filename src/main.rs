use std::{env, fs, io, path::PathBuf, str::FromStr};

use chrono::Utc;
use flight_map::{MapConfig, MapError};
use graphical_interface::SimulatedFeed;
use log::{info, LevelFilter};
use logger::{Logger, LoggerError};
use simulator::SimError;
use thiserror::Error;

const CONFIG_VAR: &str = "SKY_COCKPIT_CONFIG";
const LOG_DIR_VAR: &str = "SKY_COCKPIT_LOG_DIR";
const LOG_LEVEL_VAR: &str = "SKY_COCKPIT_LOG_LEVEL";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_TIME_RATE_MINUTES: i64 = 1;

#[derive(Debug, Error)]
enum CockpitError {
    #[error("Failed to prepare log directory: {0}")]
    LogDir(#[from] io::Error),
    #[error(transparent)]
    Logger(#[from] LoggerError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Simulation(#[from] SimError),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Cockpit window failed: {0}")]
    Ui(String),
}

/// Usage: `sky-cockpit [simulated minutes per second]`
fn main() -> Result<(), CockpitError> {
    init_logger()?;

    let config = match env::var(CONFIG_VAR) {
        Ok(path) => {
            info!("Loading map configuration from {}", path);
            MapConfig::from_file(&PathBuf::from(path))?
        }
        Err(_) => MapConfig::default(),
    };

    let time_rate = match env::args().nth(1) {
        Some(minutes) => minutes
            .parse()
            .map_err(|_| CockpitError::InvalidArgument(minutes))?,
        None => DEFAULT_TIME_RATE_MINUTES,
    };

    let feed = SimulatedFeed::with_test_data(Utc::now().naive_utc(), time_rate)?;

    graphical_interface::run(config, feed).map_err(|e| CockpitError::Ui(e.to_string()))
}

fn init_logger() -> Result<(), CockpitError> {
    let log_dir = env::var(LOG_DIR_VAR).unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
    fs::create_dir_all(&log_dir)?;

    let level = env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Info);

    Logger::new(&PathBuf::from(log_dir), "sky-cockpit")?
        .with_level(level)
        .init()?;

    Ok(())
}
