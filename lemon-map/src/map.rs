use std::{cell::RefCell, rc::Rc, time::Instant};

use egui::Context;
use egui_extras::install_image_loaders;
use logger::{Color, Logger};
use walkers::{HttpOptions, HttpTiles, Map, Position, Tiles};

use crate::{
    camera::MapCamera,
    config::Config,
    controller::AppController,
    fetcher::LemonsLoader,
    plugins,
    sheet::BottomSheet,
    types::Lemon,
    widgets::{WidgetAlert, WidgetLoader, WidgetSheet},
};

const INITIAL_LAT: f64 = 55.751244;
const INITIAL_LON: f64 = 37.618423;
const INITIAL_ZOOM: f64 = 10.0;

/// The main application struct: a map of lemons with a detail sheet.
///
/// `LemonApp` owns the widgets and the map camera, and routes every user
/// event through the [`AppController`] so the sheet and the camera stay in step.
pub struct LemonApp {
    tiles: Box<dyn Tiles>,
    camera: MapCamera,
    controller: AppController,
    sheet: BottomSheet,
    sheet_widget: WidgetSheet,
    loader: LemonsLoader,
    pressed: Rc<RefCell<Option<Lemon>>>,
    lemons_ready: bool,
    map_loaded: bool,
    alert: Option<WidgetAlert>,
    logger: Logger,
}

impl LemonApp {
    pub fn new(egui_ctx: Context, config: Config, loader: LemonsLoader, logger: Logger) -> Self {
        install_image_loaders(&egui_ctx);
        let sheet = BottomSheet::new(egui_ctx.screen_rect().height());
        let sheet_widget = WidgetSheet::new(sheet.gesture_sender());

        Self {
            tiles: Box::new(HttpTiles::with_options(
                walkers::sources::OpenStreetMap,
                HttpOptions::default(),
                egui_ctx.to_owned(),
            )),
            camera: MapCamera::new(
                Position::from_lat_lon(INITIAL_LAT, INITIAL_LON),
                INITIAL_ZOOM,
            ),
            controller: AppController::new(config.launch_url, logger.clone()),
            sheet,
            sheet_widget,
            loader,
            pressed: Rc::new(RefCell::new(None)),
            lemons_ready: false,
            map_loaded: false,
            alert: None,
            logger,
        }
    }

    fn copy_link(&mut self, ctx: &Context) {
        let alert = match self.controller.copy_link(self.sheet.lemon()) {
            Ok(url) => {
                ctx.copy_text(url);
                WidgetAlert::new("Link copied!")
            }
            Err(e) => {
                let _ = self
                    .logger
                    .warn(&format!("Link cannot be copied: {}", e), true);
                WidgetAlert::new("Link cannot be copied!")
            }
        };
        let _ = self.logger.debug(&format!("Alert: {}", alert.message()));
        self.alert = Some(alert);
    }
}

impl eframe::App for LemonApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(lemons) = self.loader.poll() {
            if let Some(message) = self.loader.error_message() {
                let _ = self
                    .logger
                    .warn(&format!("Showing the map without lemons: {}", message), false);
            }
            self.controller.set_lemons(lemons);
            self.lemons_ready = true;
        }

        if !self.lemons_ready {
            WidgetLoader::show(ctx);
            return;
        }

        let now = Instant::now();
        self.sheet.set_screen_height(ctx.screen_rect().height());
        self.sheet.animate(ctx.input(|i| i.stable_dt));
        self.controller
            .poll_scheduled(now, &mut self.sheet, &mut self.camera);
        self.camera.tick(now);

        let rimless = egui::Frame {
            fill: ctx.style().visuals.panel_fill,
            ..Default::default()
        };

        egui::CentralPanel::default()
            .frame(rimless)
            .show(ctx, |ui| {
                let home = self.camera.home();
                let selected = self.sheet.lemon().map(|lemon| lemon.id);

                let lemons_plugin = plugins::Lemons::new(
                    self.controller.lemons(),
                    self.controller.markers_visible(),
                    selected,
                    self.pressed.clone(),
                );

                let map = Map::new(Some(self.tiles.as_mut()), self.camera.memory_mut(), home)
                    .with_plugin(lemons_plugin);

                let response = ui.add(map);
                self.camera.set_viewport(response.rect.size());
            });

        if !self.map_loaded {
            self.map_loaded = true;
            let _ = self.logger.info("Map loaded", Color::Cyan, false);
            self.controller.on_map_loaded(now);
        }

        let pressed = self.pressed.borrow_mut().take();
        if let Some(lemon) = pressed {
            self.controller
                .on_marker_pressed(&lemon, &mut self.sheet, &mut self.camera);
        }

        let action = self.sheet_widget.show(ctx, &self.sheet);

        for request in self.sheet.process_gestures() {
            let _ = self.logger.debug(&format!(
                "Sheet settled on lemon {}, was active: {}",
                request.lemon.id, request.is_active
            ));
            self.controller
                .change_map_position(request.is_active, &request.lemon, &mut self.camera);
        }

        if action.close {
            if let Some(request) = self.sheet.close() {
                self.controller
                    .change_map_position(request.is_active, &request.lemon, &mut self.camera);
            }
        }

        if action.copy_link {
            self.copy_link(ctx);
        }

        let dismissed = self.alert.as_ref().is_some_and(|alert| !alert.show(ctx));
        if dismissed {
            self.alert = None;
        }

        if self.sheet.is_animating()
            || self.camera.is_animating()
            || self.controller.has_pending_actions()
        {
            ctx.request_repaint();
        }
    }
}
