use mesh_topology::config::parse_config;
use mesh_topology::{
    Config, InputEvent, InputHandler, LabelMode, LayoutMode, PointerEvent, Session, TopologyStore,
    render_svg,
};
use mesh_topology::viewport::Size;
use wasm_bindgen::prelude::*;

/// What the page should do with the DOM event it just forwarded.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFlags {
    pub prevent_default: bool,
    pub stop_propagation: bool,
    pub repaint: bool,
}

impl From<mesh_topology::EventResponse> for EventFlags {
    fn from(response: mesh_topology::EventResponse) -> Self {
        Self {
            prevent_default: response.prevent_default,
            stop_propagation: response.stop_propagation,
            repaint: response.repaint,
        }
    }
}

#[wasm_bindgen]
pub struct TopologyView {
    session: Session<TopologyStore>,
}

fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
impl TopologyView {
    /// Builds a view over `store_json`, or the bundled sample store.
    #[wasm_bindgen(constructor)]
    pub fn new(store_json: Option<String>, config_json: Option<String>) -> Result<TopologyView, JsValue> {
        let store = match store_json {
            Some(raw) => TopologyStore::from_json_str(&raw).map_err(js_error)?,
            None => TopologyStore::sample(),
        };
        let config = match config_json {
            Some(raw) => parse_config(&raw).map_err(js_error)?,
            None => Config::default(),
        };
        let session = Session::new(store, config).map_err(js_error)?;
        Ok(Self { session })
    }

    /// Returns false when the id was unknown and the first topology was used.
    pub fn select_topology(&mut self, id: &str) -> Result<bool, JsValue> {
        let selection = self.session.select_topology(id).map_err(js_error)?;
        Ok(selection.is_exact())
    }

    pub fn topology_id(&self) -> String {
        self.session.topology().topology_id.clone()
    }

    pub fn auto_layout(&mut self) {
        self.session.auto_layout();
    }

    pub fn set_layout_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = LayoutMode::from_token(mode).ok_or_else(|| js_error(format!("unknown layout mode '{mode}'")))?;
        self.session.set_layout_mode(mode);
        Ok(())
    }

    pub fn set_label_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = LabelMode::from_token(mode).ok_or_else(|| js_error(format!("unknown label mode '{mode}'")))?;
        self.session.set_label_mode(mode);
        Ok(())
    }

    pub fn persist_layout_preference(&mut self) -> Result<(), JsValue> {
        self.session.persist_layout_preference().map_err(js_error)
    }

    pub fn reset_view(&mut self) {
        self.session.reset_view();
    }

    pub fn reload(&mut self) {
        self.session.reload();
    }

    pub fn zoom_in(&mut self) {
        self.session.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.session.zoom_out();
    }

    pub fn scale(&self) -> f32 {
        self.session.viewport().scale
    }

    pub fn toggle_sidebar(&mut self) {
        self.session.toggle_sidebar();
    }

    pub fn set_node_visible(&mut self, id: &str, visible: bool) {
        self.session.set_node_visible(id, visible);
    }

    pub fn wheel(&mut self, delta_y: f32) -> EventFlags {
        self.session.dispatch(InputEvent::Wheel { delta_y }).into()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> EventFlags {
        self.session
            .dispatch(InputEvent::PointerDown(PointerEvent::at(x, y)))
            .into()
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, movement_x: f32, movement_y: f32) -> EventFlags {
        self.session
            .dispatch(InputEvent::PointerMove(PointerEvent::moved(x, y, movement_x, movement_y)))
            .into()
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> EventFlags {
        self.session
            .dispatch(InputEvent::PointerUp(PointerEvent::at(x, y)))
            .into()
    }

    pub fn resize(&mut self, width: f32, height: f32) -> EventFlags {
        self.session
            .dispatch(InputEvent::ViewportResize(Size::new(width, height)))
            .into()
    }

    /// Forward of the document's `fullscreenchange`; the page owns the
    /// actual fullscreen request.
    pub fn fullscreen_change(&mut self, fullscreen: bool) -> EventFlags {
        self.session
            .dispatch(InputEvent::FullscreenChange(fullscreen))
            .into()
    }

    pub fn svg(&self) -> String {
        let config = self.session.config();
        render_svg(&self.session.scene(), &config.theme, &config.links)
    }

    pub fn scene_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.scene()).map_err(js_error)
    }

    pub fn stats_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.stats()).map_err(js_error)
    }

    pub fn selected_node_id(&self) -> Option<String> {
        self.session.selected_node().map(|node| node.id.clone())
    }

    pub fn export_file_name(&self) -> String {
        self.session.export_file_name()
    }
}
