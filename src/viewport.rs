use serde::Serialize;

use crate::config::{RenderConfig, ViewportConfig};
use crate::model::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Camera state. `scroll` mirrors the host viewport's scroll offset, in
/// screen pixels of the scaled content.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub scale: f32,
    pub scroll: Point,
    pub fullscreen: bool,
    pub sidebar_visible: bool,
    pub window: Size,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            scroll: Point::default(),
            fullscreen: false,
            sidebar_visible: true,
            window: Size::new(1920.0, 1080.0),
        }
    }
}

/// Empty-canvas pan gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanState {
    pub active: bool,
}

/// Host capability for entering and leaving fullscreen. Returns whether
/// the platform accepted the request.
pub trait DisplaySurface {
    fn request_fullscreen(&mut self) -> bool;
    fn exit_fullscreen(&mut self) -> bool;
}

/// Screen-space transform handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    canvas: Size,
}

impl ViewportController {
    pub fn new(config: &ViewportConfig, render: &RenderConfig) -> Self {
        Self {
            config: config.clone(),
            canvas: Size::new(render.width, render.height),
        }
    }

    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }

    /// Linear wheel zoom. The host must suppress its default scroll.
    pub fn zoom_at_wheel(&self, state: &mut ViewportState, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        state.scale = self.clamp_scale(state.scale - delta_y * self.config.wheel_sensitivity);
    }

    pub fn zoom_in(&self, state: &mut ViewportState) {
        state.scale = self.clamp_scale(state.scale * self.config.zoom_step);
    }

    pub fn zoom_out(&self, state: &mut ViewportState) {
        state.scale = self.clamp_scale(state.scale / self.config.zoom_step);
    }

    pub fn set_scale(&self, state: &mut ViewportState, scale: f32) {
        if scale.is_finite() {
            state.scale = self.clamp_scale(scale);
        }
    }

    /// Camera half of reset-view; node positions are restored by the session.
    pub fn reset_camera(&self, state: &mut ViewportState) {
        state.scale = 1.0;
        state.scroll = Point::default();
    }

    pub fn begin_pan(&self, pan: &mut PanState) {
        pan.active = true;
    }

    /// Inverse-drag panning: content follows the pointer.
    pub fn pan_by(&self, state: &mut ViewportState, pan: &PanState, movement: Point) {
        if !pan.active || !movement.x.is_finite() || !movement.y.is_finite() {
            return;
        }
        state.scroll = Point::new(
            (state.scroll.x - movement.x).max(0.0),
            (state.scroll.y - movement.y).max(0.0),
        );
    }

    pub fn end_pan(&self, pan: &mut PanState) {
        pan.active = false;
    }

    pub fn screen_to_canvas(&self, state: &ViewportState, screen: Point) -> Point {
        Point::new(
            (screen.x + state.scroll.x) / state.scale,
            (screen.y + state.scroll.y) / state.scale,
        )
    }

    pub fn canvas_to_screen(&self, state: &ViewportState, canvas: Point) -> Point {
        Point::new(
            canvas.x * state.scale - state.scroll.x,
            canvas.y * state.scale - state.scroll.y,
        )
    }

    pub fn transform(&self, state: &ViewportState) -> ViewportTransform {
        ViewportTransform {
            scale: state.scale,
            translate_x: -state.scroll.x,
            translate_y: -state.scroll.y,
        }
    }

    /// Drawing surface size: the fixed canvas when windowed, the window
    /// minus the sidebar when fullscreen.
    pub fn render_size(&self, state: &ViewportState) -> Size {
        if !state.fullscreen {
            return self.canvas;
        }
        let sidebar = if state.sidebar_visible {
            self.config.sidebar_width
        } else {
            0.0
        };
        Size::new((state.window.width - sidebar).max(0.0), state.window.height.max(0.0))
    }

    pub fn toggle_fullscreen(&self, state: &mut ViewportState, surface: &mut dyn DisplaySurface) {
        if state.fullscreen {
            if surface.exit_fullscreen() {
                state.fullscreen = false;
            }
        } else if surface.request_fullscreen() {
            state.fullscreen = true;
        }
    }

    /// Platform notification; authoritative over `toggle_fullscreen`.
    pub fn on_fullscreen_change(&self, state: &mut ViewportState, fullscreen: bool) {
        state.fullscreen = fullscreen;
    }

    pub fn on_resize(&self, state: &mut ViewportState, window: Size) {
        if window.width.is_finite() && window.height.is_finite() {
            state.window = window;
        }
    }

    pub fn toggle_sidebar(&self, state: &mut ViewportState) {
        state.sidebar_visible = !state.sidebar_visible;
    }
}
