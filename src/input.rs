//! Host-independent input plumbing.
//!
//! A display host (browser, native window, test harness) translates its own
//! events into [`InputEvent`]s and feeds them to an [`InputHandler`]. Pointer
//! move/up events are expected for the whole gesture regardless of which
//! element is under the pointer, i.e. the host captures the pointer globally.

use crate::model::Point;
use crate::viewport::Size;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position relative to the viewport's top-left corner, screen pixels.
    pub position: Point,
    /// Movement since the previous pointer event, screen pixels.
    pub movement: Point,
}

impl PointerEvent {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Point::new(x, y),
            movement: Point::default(),
        }
    }

    pub fn moved(x: f32, y: f32, dx: f32, dy: f32) -> Self {
        Self {
            position: Point::new(x, y),
            movement: Point::new(dx, dy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Wheel { delta_y: f32 },
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    ViewportResize(Size),
    FullscreenChange(bool),
}

/// What the host should do with the native event after handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    pub prevent_default: bool,
    pub stop_propagation: bool,
    /// State changed and the scene should be repainted.
    pub repaint: bool,
}

impl EventResponse {
    pub const IGNORED: EventResponse = EventResponse {
        prevent_default: false,
        stop_propagation: false,
        repaint: false,
    };

    pub fn repaint() -> Self {
        Self {
            repaint: true,
            ..Self::IGNORED
        }
    }

    pub fn consumed() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: true,
            repaint: true,
        }
    }
}

pub trait InputHandler {
    fn on_wheel(&mut self, delta_y: f32) -> EventResponse;
    fn on_pointer_down(&mut self, event: PointerEvent) -> EventResponse;
    fn on_pointer_move(&mut self, event: PointerEvent) -> EventResponse;
    fn on_pointer_up(&mut self, event: PointerEvent) -> EventResponse;
    fn on_viewport_resize(&mut self, size: Size) -> EventResponse;
    fn on_fullscreen_change(&mut self, fullscreen: bool) -> EventResponse;

    fn dispatch(&mut self, event: InputEvent) -> EventResponse {
        match event {
            InputEvent::Wheel { delta_y } => self.on_wheel(delta_y),
            InputEvent::PointerDown(pointer) => self.on_pointer_down(pointer),
            InputEvent::PointerMove(pointer) => self.on_pointer_move(pointer),
            InputEvent::PointerUp(pointer) => self.on_pointer_up(pointer),
            InputEvent::ViewportResize(size) => self.on_viewport_resize(size),
            InputEvent::FullscreenChange(fullscreen) => self.on_fullscreen_change(fullscreen),
        }
    }
}
