use std::sync::mpsc::{self, Receiver, Sender};

use crate::{spring::Spring, types::Lemon};

/// Offset of the partially open sheet.
pub const PARTIAL_OFFSET: f32 = -300.0;
/// Gap left above the sheet when fully expanded.
pub const TOP_MARGIN: f32 = 50.0;
pub const SPRING_DAMPING: f32 = 50.0;

/// Releasing below `-H / HIDE_DIVISOR` hides the sheet.
const HIDE_DIVISOR: f32 = 3.0;
/// Releasing between the hide line and `-H / FULL_DIVISOR` expands it.
const FULL_DIVISOR: f32 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetPosition {
    Hidden,
    Partial,
    Full,
}

/// Pan gesture samples posted by the sheet widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Start,
    /// Vertical translation since the gesture started.
    Update { translation: f32 },
    End,
}

/// Asks the controller to move the camera after the sheet settled.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRequest {
    pub is_active: bool,
    pub lemon: Lemon,
}

/// Operations the controller is allowed to perform on the sheet.
pub trait SheetHandle {
    fn scroll_to(&mut self, destination: f32);

    fn is_active(&self) -> bool;

    fn set_lemon(&mut self, lemon: Lemon);

    fn set_on_full_screen(&mut self, on_full_screen: bool);
}

/// State of the draggable bottom sheet showing the selected lemon.
///
/// Offsets are measured from the bottom of the screen: `0` is hidden and
/// negative values pull the sheet up.
pub struct BottomSheet {
    screen_height: f32,
    translate_y: Spring,
    drag_origin: f32,
    position: SheetPosition,
    active: bool,
    on_full_screen: bool,
    lemon: Option<Lemon>,
    gesture_tx: Sender<GestureEvent>,
    gesture_rx: Receiver<GestureEvent>,
}

impl BottomSheet {
    pub fn new(screen_height: f32) -> Self {
        let (gesture_tx, gesture_rx) = mpsc::channel();
        Self {
            screen_height,
            translate_y: Spring::new(0.0, SPRING_DAMPING),
            drag_origin: 0.0,
            position: SheetPosition::Hidden,
            active: false,
            on_full_screen: false,
            lemon: None,
            gesture_tx,
            gesture_rx,
        }
    }

    /// Channel end the widget posts pan samples to.
    pub fn gesture_sender(&self) -> Sender<GestureEvent> {
        self.gesture_tx.clone()
    }

    pub fn set_screen_height(&mut self, screen_height: f32) {
        if (self.screen_height - screen_height).abs() < f32::EPSILON {
            return;
        }
        self.screen_height = screen_height;
        if self.position == SheetPosition::Full && self.translate_y.target() != 0.0 {
            self.translate_y.animate_to(self.max_translate_y());
        }
    }

    pub fn screen_height(&self) -> f32 {
        self.screen_height
    }

    /// Highest the sheet may go, `-H` clamped by the top margin.
    pub fn max_translate_y(&self) -> f32 {
        -self.screen_height + TOP_MARGIN
    }

    pub fn offset(&self) -> f32 {
        self.translate_y.value()
    }

    pub fn position(&self) -> SheetPosition {
        self.position
    }

    pub fn lemon(&self) -> Option<&Lemon> {
        self.lemon.as_ref()
    }

    pub fn on_full_screen(&self) -> bool {
        self.on_full_screen
    }

    pub fn is_animating(&self) -> bool {
        !self.translate_y.is_settled()
    }

    /// Advances the spring animation by `dt` seconds.
    pub fn animate(&mut self, dt: f32) -> bool {
        self.translate_y.step(dt)
    }

    /// Applies every queued gesture in the order it was posted.
    pub fn process_gestures(&mut self) -> Vec<CameraRequest> {
        let mut requests = Vec::new();
        while let Ok(event) = self.gesture_rx.try_recv() {
            if let Some(request) = self.handle_gesture(event) {
                requests.push(request);
            }
        }
        requests
    }

    pub fn handle_gesture(&mut self, event: GestureEvent) -> Option<CameraRequest> {
        match event {
            GestureEvent::Start => {
                self.drag_origin = self.translate_y.value();
                self.on_full_screen = false;
                None
            }
            GestureEvent::Update { translation } => {
                let offset = (self.drag_origin + translation).max(self.max_translate_y());
                self.translate_y.jump_to(offset);
                None
            }
            GestureEvent::End => self.release(),
        }
    }

    fn release(&mut self) -> Option<CameraRequest> {
        let offset = self.translate_y.value();

        if offset > -self.screen_height / HIDE_DIVISOR {
            self.on_full_screen = false;
            let request = self.camera_request();
            self.scroll_to(0.0);
            request
        } else if offset > -self.screen_height / FULL_DIVISOR {
            if self.lemon.is_none() {
                self.scroll_to(0.0);
                return None;
            }
            self.on_full_screen = true;
            self.scroll_to(self.max_translate_y());
            None
        } else {
            None
        }
    }

    /// Hides the sheet from its close button.
    ///
    /// Unlike a drag release, the camera is told about the sheet after it
    /// became inactive.
    pub fn close(&mut self) -> Option<CameraRequest> {
        self.on_full_screen = false;
        self.scroll_to(0.0);
        self.camera_request()
    }

    fn camera_request(&self) -> Option<CameraRequest> {
        self.lemon.as_ref().map(|lemon| CameraRequest {
            is_active: self.active,
            lemon: lemon.clone(),
        })
    }

    fn position_for(&self, destination: f32) -> SheetPosition {
        if destination == 0.0 {
            SheetPosition::Hidden
        } else if destination <= self.max_translate_y() {
            SheetPosition::Full
        } else {
            SheetPosition::Partial
        }
    }
}

impl SheetHandle for BottomSheet {
    fn scroll_to(&mut self, destination: f32) {
        let destination = destination.max(self.max_translate_y());
        let position = self.position_for(destination);
        if position == SheetPosition::Full && self.lemon.is_none() {
            return;
        }

        self.active = destination != 0.0;
        self.position = position;
        self.translate_y.animate_to(destination);
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_lemon(&mut self, lemon: Lemon) {
        self.lemon = Some(lemon);
    }

    fn set_on_full_screen(&mut self, on_full_screen: bool) {
        self.on_full_screen = on_full_screen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f32 = 900.0;

    fn lemon() -> Lemon {
        Lemon {
            id: 7,
            color: None,
            title: "Lemon tree".to_string(),
            latitude: 55.75,
            longitude: 37.61,
            content: "Ripe".to_string(),
        }
    }

    fn settle(sheet: &mut BottomSheet) {
        for _ in 0..1200 {
            if !sheet.animate(1.0 / 60.0) {
                break;
            }
        }
    }

    fn opened_sheet() -> BottomSheet {
        let mut sheet = BottomSheet::new(H);
        sheet.set_lemon(lemon());
        sheet.scroll_to(PARTIAL_OFFSET);
        settle(&mut sheet);
        sheet
    }

    fn drag(sheet: &mut BottomSheet, translation: f32) -> Option<CameraRequest> {
        sheet.handle_gesture(GestureEvent::Start);
        sheet.handle_gesture(GestureEvent::Update { translation });
        sheet.handle_gesture(GestureEvent::End)
    }

    #[test]
    fn test_starts_hidden_and_inactive() {
        let sheet = BottomSheet::new(H);

        assert_eq!(sheet.position(), SheetPosition::Hidden);
        assert_eq!(sheet.offset(), 0.0);
        assert!(!sheet.is_active());
        assert!(!sheet.on_full_screen());
    }

    #[test]
    fn test_scroll_to_partial_activates() {
        let sheet = opened_sheet();

        assert_eq!(sheet.position(), SheetPosition::Partial);
        assert_eq!(sheet.offset(), PARTIAL_OFFSET);
        assert!(sheet.is_active());
    }

    #[test]
    fn test_release_near_bottom_hides() {
        let mut sheet = opened_sheet();

        // -300 + 50 = -250 > -H/3 = -300
        let request = drag(&mut sheet, 50.0);
        settle(&mut sheet);

        assert_eq!(sheet.position(), SheetPosition::Hidden);
        assert_eq!(sheet.offset(), 0.0);
        assert!(!sheet.is_active());
        assert!(!sheet.on_full_screen());
        assert_eq!(
            request,
            Some(CameraRequest {
                is_active: true,
                lemon: lemon()
            })
        );
    }

    #[test]
    fn test_release_in_middle_band_expands() {
        let mut sheet = opened_sheet();

        // -300 - 200 = -500, between -H/3 = -300 and -H/1.3 ~ -692
        let request = drag(&mut sheet, -200.0);
        settle(&mut sheet);

        assert_eq!(request, None);
        assert_eq!(sheet.position(), SheetPosition::Full);
        assert_eq!(sheet.offset(), -H + TOP_MARGIN);
        assert!(sheet.on_full_screen());
        assert!(sheet.is_active());
    }

    #[test]
    fn test_release_exactly_on_hide_line_expands() {
        let mut sheet = opened_sheet();

        drag(&mut sheet, 0.0);
        settle(&mut sheet);

        assert_eq!(sheet.position(), SheetPosition::Full);
    }

    #[test]
    fn test_release_high_up_keeps_dragged_offset() {
        let mut sheet = opened_sheet();

        // -300 - 450 = -750 <= -H/1.3
        let request = drag(&mut sheet, -450.0);
        settle(&mut sheet);

        assert_eq!(request, None);
        assert_eq!(sheet.offset(), -750.0);
        assert_eq!(sheet.position(), SheetPosition::Partial);
        assert!(!sheet.on_full_screen());
    }

    #[test]
    fn test_drag_is_clamped_at_top() {
        let mut sheet = opened_sheet();

        sheet.handle_gesture(GestureEvent::Start);
        sheet.handle_gesture(GestureEvent::Update {
            translation: -5000.0,
        });

        assert_eq!(sheet.offset(), -H + TOP_MARGIN);
    }

    #[test]
    fn test_drag_start_leaves_full_screen() {
        let mut sheet = opened_sheet();
        drag(&mut sheet, -200.0);
        settle(&mut sheet);
        assert!(sheet.on_full_screen());

        sheet.handle_gesture(GestureEvent::Start);

        assert!(!sheet.on_full_screen());
    }

    #[test]
    fn test_drag_updates_follow_last_sample_only() {
        let mut sheet = opened_sheet();
        let sender = sheet.gesture_sender();

        sender.send(GestureEvent::Start).unwrap();
        sender
            .send(GestureEvent::Update { translation: -200.0 })
            .unwrap();
        sender
            .send(GestureEvent::Update { translation: 40.0 })
            .unwrap();
        sender.send(GestureEvent::End).unwrap();

        let requests = sheet.process_gestures();
        settle(&mut sheet);

        assert_eq!(requests.len(), 1);
        assert_eq!(sheet.position(), SheetPosition::Hidden);
    }

    #[test]
    fn test_pure_updates_have_no_side_effects() {
        let mut sheet = opened_sheet();
        let sender = sheet.gesture_sender();

        sender.send(GestureEvent::Start).unwrap();
        sender
            .send(GestureEvent::Update { translation: 100.0 })
            .unwrap();

        assert!(sheet.process_gestures().is_empty());
        assert!(sheet.is_active());
        assert_eq!(sheet.position(), SheetPosition::Partial);
    }

    #[test]
    fn test_close_reports_inactive_sheet() {
        let mut sheet = opened_sheet();
        drag(&mut sheet, -200.0);
        settle(&mut sheet);

        let request = sheet.close();
        settle(&mut sheet);

        assert_eq!(sheet.position(), SheetPosition::Hidden);
        assert!(!sheet.on_full_screen());
        assert_eq!(
            request,
            Some(CameraRequest {
                is_active: false,
                lemon: lemon()
            })
        );
    }

    #[test]
    fn test_never_full_without_lemon() {
        let mut sheet = BottomSheet::new(H);

        sheet.scroll_to(-H + TOP_MARGIN);
        assert_eq!(sheet.position(), SheetPosition::Hidden);

        sheet.handle_gesture(GestureEvent::Start);
        sheet.handle_gesture(GestureEvent::Update { translation: -500.0 });
        let request = sheet.handle_gesture(GestureEvent::End);
        settle(&mut sheet);

        assert_eq!(request, None);
        assert_eq!(sheet.position(), SheetPosition::Hidden);
        assert_eq!(sheet.offset(), 0.0);
    }

    #[test]
    fn test_full_follows_screen_resize() {
        let mut sheet = opened_sheet();
        drag(&mut sheet, -200.0);
        settle(&mut sheet);

        sheet.set_screen_height(1000.0);
        settle(&mut sheet);

        assert_eq!(sheet.offset(), -1000.0 + TOP_MARGIN);
    }
}
