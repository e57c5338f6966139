use std::{
    fmt,
    time::{Duration, Instant},
};

use logger::{Color, Logger};

use crate::{
    camera::{CameraHandle, FOCUS_ZOOM},
    deep_link::{self, DeepLinkError},
    scheduler::Scheduler,
    sheet::{SheetHandle, PARTIAL_OFFSET},
    types::Lemon,
};

/// Time given to the map to settle before the first camera move.
pub const MAP_SETTLE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    PressMarker(Lemon),
    FitAllMarkers,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinkError {
    NoLaunchUrl,
    NoSelection,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::NoLaunchUrl => write!(f, "the app was not opened from a link"),
            LinkError::NoSelection => write!(f, "no lemon is selected"),
        }
    }
}

impl std::error::Error for LinkError {}

/// Owns the lemons and keeps the sheet and the map camera in step.
pub struct AppController {
    lemons: Vec<Lemon>,
    markers_visible: bool,
    launch_url: Option<String>,
    scheduler: Scheduler<PendingAction>,
    logger: Logger,
}

impl AppController {
    pub fn new(launch_url: Option<String>, logger: Logger) -> Self {
        Self {
            lemons: Vec::new(),
            markers_visible: false,
            launch_url,
            scheduler: Scheduler::new(),
            logger,
        }
    }

    pub fn lemons(&self) -> &[Lemon] {
        &self.lemons
    }

    pub fn markers_visible(&self) -> bool {
        self.markers_visible
    }

    pub fn has_pending_actions(&self) -> bool {
        !self.scheduler.is_empty()
    }

    /// Replaces the whole lemon set.
    pub fn set_lemons(&mut self, lemons: Vec<Lemon>) {
        for lemon in lemons.iter().filter(|lemon| !lemon.has_valid_color()) {
            let _ = self.logger.warn(
                &format!(
                    "Lemon {} has an unusable color {:?}, drawing it with the default",
                    lemon.id, lemon.color
                ),
                false,
            );
        }
        self.lemons = lemons;
    }

    /// Reveals the markers and schedules the first camera move: the lemon
    /// from the launch URL if there is one, every marker otherwise.
    pub fn on_map_loaded(&mut self, now: Instant) {
        self.markers_visible = true;

        let action = match self.resolve_launch_url() {
            Ok(lemon) => {
                let _ = self.logger.info(
                    &format!("Opening lemon {} from launch URL", lemon.id),
                    Color::Cyan,
                    true,
                );
                PendingAction::PressMarker(lemon.clone())
            }
            Err(e @ (DeepLinkError::NoLaunchUrl | DeepLinkError::MissingSegment)) => {
                let _ = self.logger.debug(&e.to_string());
                PendingAction::FitAllMarkers
            }
            Err(e) => {
                let _ = self
                    .logger
                    .warn(&format!("Ignoring launch URL: {}", e), true);
                PendingAction::FitAllMarkers
            }
        };

        self.scheduler.schedule_after(now, MAP_SETTLE_DELAY, action);
    }

    fn resolve_launch_url(&self) -> Result<&Lemon, DeepLinkError> {
        let url = self
            .launch_url
            .as_deref()
            .ok_or(DeepLinkError::NoLaunchUrl)?;
        deep_link::resolve(url, &self.lemons)
    }

    /// Runs the scheduled actions whose delay has elapsed.
    pub fn poll_scheduled<S, C>(&mut self, now: Instant, sheet: &mut S, camera: &mut C)
    where
        S: SheetHandle,
        C: CameraHandle,
    {
        for action in self.scheduler.take_due(now) {
            match action {
                PendingAction::PressMarker(lemon) => self.on_marker_pressed(&lemon, sheet, camera),
                PendingAction::FitAllMarkers => camera.fit_all_markers(&self.lemons),
            }
        }
    }

    /// Opens the sheet on `lemon`. Pressing while the sheet is already
    /// active keeps it partially open but zooms out to every marker.
    pub fn on_marker_pressed<S, C>(&self, lemon: &Lemon, sheet: &mut S, camera: &mut C)
    where
        S: SheetHandle,
        C: CameraHandle,
    {
        let is_active = sheet.is_active();
        let _ = self.logger.debug(&format!(
            "Marker {} pressed, sheet active: {}",
            lemon.id, is_active
        ));

        sheet.set_lemon(lemon.clone());
        sheet.set_on_full_screen(false);
        sheet.scroll_to(PARTIAL_OFFSET);
        self.change_map_position(is_active, lemon, camera);
    }

    pub fn change_map_position<C: CameraHandle>(&self, is_active: bool, lemon: &Lemon, camera: &mut C) {
        if is_active {
            camera.fit_all_markers(&self.lemons);
        } else {
            camera.set_center(lemon.position(), FOCUS_ZOOM);
        }
    }

    /// Link to `lemon` derived from the launch URL.
    pub fn copy_link(&self, lemon: Option<&Lemon>) -> Result<String, LinkError> {
        let launch_url = self.launch_url.as_deref().ok_or(LinkError::NoLaunchUrl)?;
        let lemon = lemon.ok_or(LinkError::NoSelection)?;
        let url = deep_link::share_url(launch_url, lemon.id);
        let _ = self
            .logger
            .info(&format!("Copied link {}", url), Color::Blue, false);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{BottomSheet, SheetPosition};
    use walkers::Position;

    #[derive(Debug, PartialEq)]
    enum CameraCall {
        FitAll(usize),
        Center(f64, f64, f64),
    }

    #[derive(Default)]
    struct RecordingCamera {
        calls: Vec<CameraCall>,
    }

    impl CameraHandle for RecordingCamera {
        fn fit_all_markers(&mut self, lemons: &[Lemon]) {
            self.calls.push(CameraCall::FitAll(lemons.len()));
        }

        fn set_center(&mut self, position: Position, zoom: f64) {
            self.calls
                .push(CameraCall::Center(position.lat(), position.lon(), zoom));
        }
    }

    fn lemon(id: i64) -> Lemon {
        Lemon {
            id,
            color: None,
            title: format!("Lemon {}", id),
            latitude: 55.0 + id as f64,
            longitude: 37.0 + id as f64,
            content: String::new(),
        }
    }

    fn controller(launch_url: Option<&str>) -> AppController {
        let dir = std::env::temp_dir().join(format!("lemons_controller_{}", std::process::id()));
        let logger = Logger::new(&dir, "controller").expect("Failed to create logger");
        let mut controller = AppController::new(launch_url.map(str::to_string), logger);
        controller.set_lemons(vec![lemon(3), lemon(7)]);
        controller
    }

    #[test]
    fn test_press_while_hidden_opens_partially_and_centers() {
        let controller = controller(None);
        let mut sheet = BottomSheet::new(900.0);
        let mut camera = RecordingCamera::default();

        controller.on_marker_pressed(&lemon(3), &mut sheet, &mut camera);

        assert_eq!(sheet.position(), SheetPosition::Partial);
        assert_eq!(sheet.lemon(), Some(&lemon(3)));
        assert!(!sheet.on_full_screen());
        assert_eq!(camera.calls, vec![CameraCall::Center(58.0, 40.0, 15.0)]);
    }

    #[test]
    fn test_press_while_active_stays_partial_and_fits_all() {
        let controller = controller(None);
        let mut sheet = BottomSheet::new(900.0);
        let mut camera = RecordingCamera::default();

        controller.on_marker_pressed(&lemon(3), &mut sheet, &mut camera);
        controller.on_marker_pressed(&lemon(3), &mut sheet, &mut camera);

        assert_eq!(sheet.position(), SheetPosition::Partial);
        assert_eq!(camera.calls[1], CameraCall::FitAll(2));
    }

    #[test]
    fn test_markers_hidden_until_map_loaded() {
        let mut controller = controller(None);
        assert!(!controller.markers_visible());

        controller.on_map_loaded(Instant::now());

        assert!(controller.markers_visible());
    }

    #[test]
    fn test_launch_url_selects_lemon_after_delay() {
        let mut controller = controller(Some("lemons://app/lemonId/7"));
        let mut sheet = BottomSheet::new(900.0);
        let mut camera = RecordingCamera::default();
        let loaded = Instant::now();

        controller.on_map_loaded(loaded);
        controller.poll_scheduled(loaded, &mut sheet, &mut camera);
        assert!(camera.calls.is_empty());
        assert!(controller.has_pending_actions());

        controller.poll_scheduled(loaded + MAP_SETTLE_DELAY, &mut sheet, &mut camera);

        assert_eq!(sheet.lemon().map(|l| l.id), Some(7));
        assert_eq!(sheet.position(), SheetPosition::Partial);
        assert_eq!(camera.calls, vec![CameraCall::Center(62.0, 44.0, 15.0)]);
        assert!(!controller.has_pending_actions());
    }

    #[test]
    fn test_unknown_launch_id_fits_all() {
        let mut controller = controller(Some("lemons://app/lemonId/99"));
        let mut sheet = BottomSheet::new(900.0);
        let mut camera = RecordingCamera::default();
        let loaded = Instant::now();

        controller.on_map_loaded(loaded);
        controller.poll_scheduled(loaded + MAP_SETTLE_DELAY, &mut sheet, &mut camera);

        assert_eq!(sheet.position(), SheetPosition::Hidden);
        assert_eq!(sheet.lemon(), None);
        assert_eq!(camera.calls, vec![CameraCall::FitAll(2)]);
    }

    #[test]
    fn test_no_launch_url_fits_all() {
        let mut controller = controller(None);
        let mut sheet = BottomSheet::new(900.0);
        let mut camera = RecordingCamera::default();
        let loaded = Instant::now();

        controller.on_map_loaded(loaded);
        controller.poll_scheduled(loaded + MAP_SETTLE_DELAY, &mut sheet, &mut camera);

        assert_eq!(camera.calls, vec![CameraCall::FitAll(2)]);
    }

    #[test]
    fn test_sheet_release_moves_camera() {
        let controller = controller(None);
        let mut sheet = BottomSheet::new(900.0);
        let mut camera = RecordingCamera::default();

        controller.on_marker_pressed(&lemon(7), &mut sheet, &mut camera);
        let request = sheet.close().expect("a lemon is selected");
        controller.change_map_position(request.is_active, &request.lemon, &mut camera);

        assert_eq!(camera.calls.len(), 2);
        assert_eq!(camera.calls[1], CameraCall::Center(62.0, 44.0, 15.0));
    }

    #[test]
    fn test_copy_link() {
        let controller = controller(Some("lemons://app/lemonId/3"));

        assert_eq!(
            controller.copy_link(Some(&lemon(7))),
            Ok("lemons://app/lemonId/7".to_string())
        );
        assert_eq!(controller.copy_link(None), Err(LinkError::NoSelection));
    }

    #[test]
    fn test_copy_link_without_launch_url() {
        let controller = controller(None);

        assert_eq!(
            controller.copy_link(Some(&lemon(7))),
            Err(LinkError::NoLaunchUrl)
        );
    }
}
