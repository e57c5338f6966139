use std::fmt;

use logger::LoggerError;

use crate::{config::ConfigError, fetcher::FetchError};

/// Errors that stop the application from starting or running.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Logger(LoggerError),
    Fetch(FetchError),
    Io(std::io::Error),
    Gui(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Logger(e) => write!(f, "Could not set up logging: {}", e),
            AppError::Fetch(e) => write!(f, "Could not prepare the lemons fetch: {}", e),
            AppError::Io(e) => write!(f, "I/O error: {}", e),
            AppError::Gui(msg) => write!(f, "Window error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Logger(e) => Some(e),
            AppError::Fetch(e) => Some(e),
            AppError::Io(e) => Some(e),
            AppError::Gui(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<LoggerError> for AppError {
    fn from(err: LoggerError) -> Self {
        AppError::Logger(err)
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::Fetch(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<eframe::Error> for AppError {
    fn from(err: eframe::Error) -> Self {
        AppError::Gui(err.to_string())
    }
}
