use tracing::{debug, info, warn};

use crate::config::Config;
use crate::drag::{DragController, DragState};
use crate::input::{EventResponse, InputHandler, PointerEvent};
use crate::layout::compute_layout;
use crate::model::{LabelMode, LayoutMode, MeshLink, MeshNode, Point, TopologyMap};
use crate::render::export_file_name;
use crate::scene::Scene;
use crate::stats::{TopologyStats, compute_stats};
use crate::store::{StoreError, TopologySource};
use crate::viewport::{DisplaySurface, PanState, Size, ViewportController, ViewportState};
use crate::visibility::{NodeFilter, VisibilityMap};

/// Working copy of the active topology. Layout and drag write here, never
/// to the store record.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyState {
    pub topology_id: String,
    pub topology_name: String,
    pub customer_id: String,
    pub nodes: Vec<MeshNode>,
    pub links: Vec<MeshLink>,
    pub layout_mode: LayoutMode,
    pub label_mode: LabelMode,
}

impl TopologyState {
    pub fn from_map(map: &TopologyMap) -> Self {
        Self {
            topology_id: map.id.clone(),
            topology_name: map.name.clone(),
            customer_id: map.customer_id.clone(),
            nodes: map.nodes.clone(),
            links: map.links.clone(),
            layout_mode: map.layout_preference,
            label_mode: map.label_mode,
        }
    }

    pub fn node(&self, id: &str) -> Option<&MeshNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Outcome of a topology switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Exact(String),
    /// The requested id was unknown; `used` was loaded instead.
    Fallback { requested: String, used: String },
}

impl Selection {
    pub fn topology_id(&self) -> &str {
        match self {
            Selection::Exact(id) => id,
            Selection::Fallback { used, .. } => used,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Selection::Exact(_))
    }
}

/// One interactive view over a topology store.
pub struct Session<S: TopologySource> {
    store: S,
    config: Config,
    viewport_ctl: ViewportController,
    drag_ctl: DragController,
    topology: TopologyState,
    visibility: VisibilityMap,
    filter: NodeFilter,
    viewport: ViewportState,
    pan: PanState,
    drag: DragState,
    selected: Option<String>,
}

impl<S: TopologySource> Session<S> {
    /// Opens the store's first topology.
    pub fn new(store: S, config: Config) -> Result<Self, StoreError> {
        let first = store.first_topology().ok_or(StoreError::Empty)?;
        let topology = TopologyState::from_map(first);
        let visibility = VisibilityMap::all_visible(&topology.nodes);
        Ok(Self {
            viewport_ctl: ViewportController::new(&config.viewport, &config.render),
            drag_ctl: DragController::new(config.layout.bounds),
            store,
            config,
            topology,
            visibility,
            filter: NodeFilter::default(),
            viewport: ViewportState::default(),
            pan: PanState::default(),
            drag: DragState::default(),
            selected: None,
        })
    }

    /// Switches the active topology. Cancels any drag or pan, reseeds the
    /// working set, shows every node and resets the camera. The stored
    /// layout preference becomes the active mode but is not applied.
    pub fn select_topology(&mut self, id: &str) -> Result<Selection, StoreError> {
        let (map, selection) = match self.store.get_topology(id) {
            Ok(map) => (map, Selection::Exact(id.to_string())),
            Err(StoreError::NotFound(_)) => {
                let map = self.store.first_topology().ok_or(StoreError::Empty)?;
                warn!(requested = id, used = %map.id, "unknown topology, falling back");
                let selection = Selection::Fallback {
                    requested: id.to_string(),
                    used: map.id.clone(),
                };
                (map, selection)
            }
            Err(err) => return Err(err),
        };

        self.drag_ctl.end(&mut self.drag);
        self.viewport_ctl.end_pan(&mut self.pan);

        self.topology = TopologyState::from_map(map);
        self.visibility.reset(&self.topology.nodes);
        self.viewport_ctl.reset_camera(&mut self.viewport);
        self.selected = None;

        info!(
            topology = %self.topology.topology_id,
            nodes = self.topology.nodes.len(),
            links = self.topology.links.len(),
            "selected topology"
        );
        Ok(selection)
    }

    /// Runs the active layout mode once over the working set.
    pub fn auto_layout(&mut self) {
        self.topology.nodes = compute_layout(
            &self.topology.nodes,
            &self.topology.links,
            self.topology.layout_mode,
            &self.config.layout,
        );
        info!(
            mode = ?self.topology.layout_mode,
            nodes = self.topology.nodes.len(),
            "applied layout"
        );
    }

    /// Changes the mode used by the next `auto_layout`; positions are untouched.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.topology.layout_mode = mode;
    }

    pub fn set_label_mode(&mut self, mode: LabelMode) {
        self.topology.label_mode = mode;
    }

    pub fn persist_layout_preference(&mut self) -> Result<(), StoreError> {
        self.store
            .save_layout_preference(&self.topology.topology_id, self.topology.layout_mode)
    }

    /// Camera back to the origin at scale 1 and node positions back to the
    /// stored record.
    pub fn reset_view(&mut self) {
        self.drag_ctl.end(&mut self.drag);
        self.viewport_ctl.end_pan(&mut self.pan);
        self.viewport_ctl.reset_camera(&mut self.viewport);
        match self.store.get_topology(&self.topology.topology_id) {
            Ok(map) => {
                self.topology.nodes = map.nodes.clone();
                debug!(topology = %map.id, "view reset");
            }
            Err(err) => warn!(error = %err, "view reset without node reload"),
        }
    }

    /// Re-seeds nodes and links from the store, keeping the camera.
    pub fn reload(&mut self) {
        self.drag_ctl.end(&mut self.drag);
        match self.store.get_topology(&self.topology.topology_id) {
            Ok(map) => {
                self.topology.nodes = map.nodes.clone();
                self.topology.links = map.links.clone();
            }
            Err(err) => warn!(error = %err, "reload skipped"),
        }
    }

    pub fn zoom_in(&mut self) {
        self.viewport_ctl.zoom_in(&mut self.viewport);
    }

    pub fn zoom_out(&mut self) {
        self.viewport_ctl.zoom_out(&mut self.viewport);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.viewport_ctl.set_scale(&mut self.viewport, scale);
    }

    pub fn toggle_fullscreen(&mut self, surface: &mut dyn DisplaySurface) {
        self.viewport_ctl.toggle_fullscreen(&mut self.viewport, surface);
    }

    pub fn toggle_sidebar(&mut self) {
        self.viewport_ctl.toggle_sidebar(&mut self.viewport);
    }

    pub fn set_node_visible(&mut self, id: &str, visible: bool) {
        self.visibility.set_visible(id, visible);
    }

    pub fn toggle_node_visibility(&mut self, id: &str) -> bool {
        self.visibility.toggle(id)
    }

    pub fn set_filter(&mut self, filter: NodeFilter) {
        self.filter = filter;
    }

    /// Nodes for the side list, in topology order.
    pub fn filtered_nodes(&self) -> Vec<&MeshNode> {
        self.filter.apply(&self.topology.nodes)
    }

    pub fn select_node(&mut self, id: &str) -> Option<&MeshNode> {
        let node = self.topology.node(id)?;
        self.selected = Some(node.id.clone());
        Some(node)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_node(&self) -> Option<&MeshNode> {
        self.selected.as_deref().and_then(|id| self.topology.node(id))
    }

    /// Resolved neighbours of `id`; dangling references are dropped.
    pub fn neighbors(&self, id: &str) -> Vec<&MeshNode> {
        let Some(node) = self.topology.node(id) else {
            return Vec::new();
        };
        node.links
            .iter()
            .filter_map(|neighbor| self.topology.node(neighbor))
            .collect()
    }

    pub fn stats(&self) -> TopologyStats {
        compute_stats(&self.topology.nodes, &self.topology.links)
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.store
            .customer(&self.topology.customer_id)
            .map(|customer| customer.name.as_str())
    }

    pub fn export_file_name(&self) -> String {
        export_file_name(self.customer_name(), &self.topology.topology_name)
    }

    pub fn scene(&self) -> Scene {
        Scene::build(
            &self.topology,
            &self.visibility,
            self.customer_name().map(str::to_string),
            self.viewport_ctl.render_size(&self.viewport),
            self.viewport_ctl.transform(&self.viewport),
            &self.config.links,
        )
    }

    /// Topmost visible node under a canvas point.
    pub fn hit_test(&self, canvas: Point) -> Option<&MeshNode> {
        self.visibility
            .visible_nodes(&self.topology.nodes)
            .filter(|node| {
                let dx = node.x - canvas.x;
                let dy = node.y - canvas.y;
                dx.hypot(dy) <= node.node_type.radius()
            })
            .last()
    }

    pub fn topology(&self) -> &TopologyState {
        &self.topology
    }

    pub fn visibility(&self) -> &VisibilityMap {
        &self.visibility
    }

    pub fn filter(&self) -> &NodeFilter {
        &self.filter
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn is_panning(&self) -> bool {
        self.pan.active
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn pointer_to_canvas(&self, event: &PointerEvent) -> Point {
        self.viewport_ctl.screen_to_canvas(&self.viewport, event.position)
    }
}

impl<S: TopologySource> InputHandler for Session<S> {
    fn on_wheel(&mut self, delta_y: f32) -> EventResponse {
        self.viewport_ctl.zoom_at_wheel(&mut self.viewport, delta_y);
        EventResponse {
            prevent_default: true,
            stop_propagation: false,
            repaint: true,
        }
    }

    fn on_pointer_down(&mut self, event: PointerEvent) -> EventResponse {
        let canvas = self.pointer_to_canvas(&event);
        let hit = self.hit_test(canvas).cloned();
        match hit {
            Some(node) => {
                self.drag_ctl.begin(&mut self.drag, &node, canvas);
                self.selected = Some(node.id);
                EventResponse::consumed()
            }
            None => {
                self.viewport_ctl.begin_pan(&mut self.pan);
                EventResponse::IGNORED
            }
        }
    }

    fn on_pointer_move(&mut self, event: PointerEvent) -> EventResponse {
        if self.drag.is_active() {
            // Scale is read per event so a zoom mid-drag keeps the anchor.
            let canvas = self.pointer_to_canvas(&event);
            return match self.drag_ctl.update(&self.drag, &mut self.topology.nodes, canvas) {
                Some(_) => EventResponse::consumed(),
                None => EventResponse::IGNORED,
            };
        }
        if self.pan.active {
            self.viewport_ctl.pan_by(&mut self.viewport, &self.pan, event.movement);
            return EventResponse::repaint();
        }
        EventResponse::IGNORED
    }

    fn on_pointer_up(&mut self, _event: PointerEvent) -> EventResponse {
        let was_active = self.drag.is_active() || self.pan.active;
        self.drag_ctl.end(&mut self.drag);
        self.viewport_ctl.end_pan(&mut self.pan);
        if was_active {
            EventResponse::repaint()
        } else {
            EventResponse::IGNORED
        }
    }

    fn on_viewport_resize(&mut self, size: Size) -> EventResponse {
        self.viewport_ctl.on_resize(&mut self.viewport, size);
        if self.viewport.fullscreen {
            EventResponse::repaint()
        } else {
            EventResponse::IGNORED
        }
    }

    fn on_fullscreen_change(&mut self, fullscreen: bool) -> EventResponse {
        self.viewport_ctl.on_fullscreen_change(&mut self.viewport, fullscreen);
        EventResponse::repaint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;
    use crate::model::NodeType;
    use crate::store::TopologyStore;

    fn session() -> Session<TopologyStore> {
        Session::new(TopologyStore::sample(), Config::default()).unwrap()
    }

    #[test]
    fn opens_first_topology_with_everything_visible() {
        let s = session();
        assert_eq!(s.topology().topology_id, "topo-c1-1");
        assert_eq!(s.topology().layout_mode, LayoutMode::Hierarchy);
        assert_eq!(s.visibility().hidden_count(), 0);
        assert_eq!(s.scene().nodes.len(), 5);
    }

    #[test]
    fn empty_store_is_rejected() {
        assert!(matches!(
            Session::new(TopologyStore::default(), Config::default()),
            Err(StoreError::Empty)
        ));
    }

    #[test]
    fn unknown_id_falls_back_distinguishably() {
        let mut s = session();
        let selection = s.select_topology("topo-c2-1").unwrap();
        assert_eq!(selection, Selection::Exact("topo-c2-1".to_string()));
        let selection = s.select_topology("does-not-exist").unwrap();
        assert!(!selection.is_exact());
        assert_eq!(selection.topology_id(), "topo-c1-1");
        assert_eq!(s.topology().topology_id, "topo-c1-1");
    }

    #[test]
    fn switch_resets_visibility_drag_and_camera_but_keeps_positions() {
        let mut s = session();
        s.set_node_visible("c1-t1-n5", false);
        s.zoom_in();
        let gateway = s.topology().nodes[0].clone();
        let scale = s.viewport().scale;
        s.dispatch(InputEvent::PointerDown(PointerEvent::at(gateway.x * scale, gateway.y * scale)));
        assert!(s.drag().is_active());

        s.select_topology("topo-c1-2").unwrap();
        assert!(!s.drag().is_active());
        assert_eq!(s.visibility().hidden_count(), 0);
        assert_eq!(s.viewport().scale, 1.0);
        assert_eq!(s.topology().layout_mode, LayoutMode::Force);
        assert_eq!(s.topology().label_mode, LabelMode::Bandwidth);
        let stored = s.store().get_topology("topo-c1-2").unwrap().clone();
        assert_eq!(s.topology().nodes, stored.nodes);

        // A stray move after the switch must not write into the new set.
        s.dispatch(InputEvent::PointerMove(PointerEvent::moved(900.0, 900.0, 5.0, 5.0)));
        assert_eq!(s.topology().nodes, stored.nodes);
    }

    #[test]
    fn reset_view_is_idempotent() {
        let mut s = session();
        s.set_layout_mode(LayoutMode::Force);
        s.auto_layout();
        s.zoom_in();
        s.reset_view();
        let first = (s.topology().nodes.clone(), s.viewport().scale);
        s.reset_view();
        let second = (s.topology().nodes.clone(), s.viewport().scale);
        assert_eq!(first, second);
        assert_eq!(first.1, 1.0);
        assert_eq!(first.0, s.store().get_topology("topo-c1-1").unwrap().nodes);
    }

    #[test]
    fn switching_mode_does_not_move_nodes() {
        let mut s = session();
        let before = s.topology().nodes.clone();
        s.set_layout_mode(LayoutMode::Force);
        assert_eq!(s.topology().nodes, before);
        s.auto_layout();
        assert_ne!(s.topology().nodes, before);
    }

    #[test]
    fn pointer_on_empty_canvas_pans() {
        let mut s = session();
        s.viewport.scroll = Point::new(200.0, 200.0);
        let response = s.dispatch(InputEvent::PointerDown(PointerEvent::at(5.0, 5.0)));
        assert!(!response.stop_propagation);
        assert!(s.is_panning());
        s.dispatch(InputEvent::PointerMove(PointerEvent::moved(25.0, 15.0, 20.0, 10.0)));
        assert_eq!(s.viewport().scroll, Point::new(180.0, 190.0));
        s.dispatch(InputEvent::PointerUp(PointerEvent::at(25.0, 15.0)));
        assert!(!s.is_panning());
    }

    #[test]
    fn pointer_on_node_drags_instead_of_panning() {
        let mut s = session();
        s.set_scale(2.0);
        let node = s.topology().nodes[1].clone();
        let screen = Point::new(node.x * 2.0 + 4.0, node.y * 2.0);
        let response = s.dispatch(InputEvent::PointerDown(PointerEvent {
            position: screen,
            movement: Point::default(),
        }));
        assert!(response.stop_propagation && response.prevent_default);
        assert!(!s.is_panning());
        assert_eq!(s.selected_node().map(|n| n.id.as_str()), Some(node.id.as_str()));

        s.dispatch(InputEvent::PointerMove(PointerEvent::moved(screen.x + 60.0, screen.y + 20.0, 60.0, 20.0)));
        let moved = s.topology().node(&node.id).unwrap();
        assert!((moved.x - (node.x + 30.0)).abs() < 1e-3);
        assert!((moved.y - (node.y + 10.0)).abs() < 1e-3);
        assert_eq!(s.viewport().scroll, Point::default());

        s.dispatch(InputEvent::PointerUp(PointerEvent::at(0.0, 0.0)));
        assert!(!s.drag().is_active());
    }

    #[test]
    fn wheel_prevents_default_and_clamps() {
        let mut s = session();
        for _ in 0..100 {
            let response = s.dispatch(InputEvent::Wheel { delta_y: -500.0 });
            assert!(response.prevent_default);
        }
        assert_eq!(s.viewport().scale, 3.0);
    }

    #[test]
    fn hidden_nodes_are_not_hit() {
        let mut s = session();
        let node = s.topology().nodes[0].clone();
        s.set_node_visible(&node.id, false);
        assert!(s.hit_test(node.position()).is_none());
    }

    #[test]
    fn neighbors_skip_dangling_ids() {
        let mut s = session();
        s.topology.nodes[0].links.push("ghost".to_string());
        let names: Vec<&str> = s.neighbors("c1-t1-n1").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(names, vec!["c1-t1-n2", "c1-t1-n3"]);
        assert!(s.neighbors("ghost").is_empty());
    }

    #[test]
    fn filter_scopes_list_only() {
        let mut s = session();
        s.set_filter(NodeFilter {
            node_type: crate::visibility::TypeFilter::Relay,
            ..NodeFilter::default()
        });
        assert!(s.filtered_nodes().iter().all(|n| n.node_type == NodeType::Relay));
        assert_eq!(s.scene().nodes.len(), 5);
    }

    #[test]
    fn persisted_preference_survives_reselect() {
        let mut s = session();
        s.set_layout_mode(LayoutMode::Force);
        s.persist_layout_preference().unwrap();
        s.select_topology("topo-c1-2").unwrap();
        s.select_topology("topo-c1-1").unwrap();
        assert_eq!(s.topology().layout_mode, LayoutMode::Force);
    }

    #[test]
    fn export_name_uses_customer_and_topology() {
        let s = session();
        assert_eq!(s.export_file_name(), "Huawei-Technologies-Headquarters.svg");
    }
}
