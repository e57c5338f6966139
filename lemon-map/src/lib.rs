use fetcher::{HttpProvider, LemonsLoader};
use logger::{Color, Logger};

pub mod camera;
pub mod config;
pub mod controller;
pub mod deep_link;
pub mod error;
pub mod fetcher;
mod map;
pub mod plugins;
pub mod scheduler;
pub mod sheet;
mod spring;
pub mod types;
mod widgets;
pub use config::Config;
pub use error::AppError;
use map::LemonApp;

const LOG_NAME: &str = "lemon_map";

/// Starts the lemons fetch and opens the map window.
pub fn run(config: Config) -> Result<(), AppError> {
    let logger = Logger::new(&config.log_dir, LOG_NAME)?;
    let _ = logger.info(
        &format!("Loading lemons from {}", config.endpoint),
        Color::White,
        true,
    );

    let provider = HttpProvider::new(&config.endpoint)?;
    let loader = LemonsLoader::spawn(provider, logger.clone())?;
    let title = config.window_title.clone();

    eframe::run_native(
        &title,
        Default::default(),
        Box::new(move |cc| {
            Ok(Box::new(LemonApp::new(
                cc.egui_ctx.clone(),
                config,
                loader,
                logger,
            )))
        }),
    )?;

    Ok(())
}
