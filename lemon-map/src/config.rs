use std::{env, fmt, path::PathBuf};

pub const DEFAULT_ENDPOINT: &str =
    "https://raw.githubusercontent.com/fullstackPrincess/test/main/data.json";
pub const ENDPOINT_ENV: &str = "LEMONS_ENDPOINT";
pub const LOG_DIR_ENV: &str = "LEMONS_LOG_DIR";
const WINDOW_TITLE: &str = "Lemons";
const LOG_DIR_NAME: &str = "lemons_logs";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Usage(String),
    InvalidEndpoint(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Usage(msg) => write!(f, "{}", msg),
            ConfigError::InvalidEndpoint(url) => {
                write!(f, "Endpoint must be an http(s) URL, got {:?}", url)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime settings, read from the command line and the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub endpoint: String,
    /// URL the app was opened with, possibly pointing to a lemon.
    pub launch_url: Option<String>,
    pub log_dir: PathBuf,
    pub window_title: String,
}

impl Config {
    /// Usage: `lemons [launch_url]`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_args(env::args().skip(1), |key| env::var(key).ok())
    }

    pub fn from_args<I, F>(args: I, lookup: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        if args.len() > 1 {
            return Err(ConfigError::Usage(
                "Usage: lemons [launch_url]".to_string(),
            ));
        }

        let launch_url = args
            .into_iter()
            .next()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let endpoint = lookup(ENDPOINT_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidEndpoint(endpoint));
        }

        let log_dir = lookup(LOG_DIR_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(LOG_DIR_NAME));

        Ok(Self {
            endpoint,
            launch_url,
            log_dir,
            window_title: WINDOW_TITLE.to_string(),
        })
    }
}
