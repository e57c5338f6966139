use lemon_map::Config;

/// Opens the lemons map.
///
/// # Usage
///
/// ```sh
/// cargo run -- [launch_url]
/// ```
///
/// A launch URL ending in `/lemonId/<id>` opens that lemon once the map is ready.
/// `LEMONS_ENDPOINT` and `LEMONS_LOG_DIR` override the data source and the log directory.
fn main() -> Result<(), String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;
    lemon_map::run(config).map_err(|e| e.to_string())
}
