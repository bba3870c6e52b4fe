use crate::config::CanvasBounds;
use crate::model::{MeshNode, Point};

/// A node grabbed by the pointer. `offset` is canvas-space, pointer minus
/// node position at grab time.
#[derive(Debug, Clone, PartialEq)]
pub struct Grab {
    pub node_id: String,
    pub offset: Point,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    grab: Option<Grab>,
}

impl DragState {
    pub fn is_active(&self) -> bool {
        self.grab.is_some()
    }

    pub fn grab(&self) -> Option<&Grab> {
        self.grab.as_ref()
    }
}

/// Relocates single nodes. Callers convert pointer positions with the scale
/// current at event time, so a zoom during a drag keeps the anchor.
#[derive(Debug, Clone)]
pub struct DragController {
    bounds: CanvasBounds,
}

impl DragController {
    pub fn new(bounds: CanvasBounds) -> Self {
        Self { bounds }
    }

    pub fn begin(&self, drag: &mut DragState, node: &MeshNode, pointer: Point) {
        drag.grab = Some(Grab {
            node_id: node.id.clone(),
            offset: pointer - node.position(),
        });
    }

    /// Moves the grabbed node under `pointer`. Returns the committed position,
    /// or `None` when nothing is grabbed or the node is gone.
    pub fn update(&self, drag: &DragState, nodes: &mut [MeshNode], pointer: Point) -> Option<Point> {
        let grab = drag.grab.as_ref()?;
        if !pointer.x.is_finite() || !pointer.y.is_finite() {
            return None;
        }
        let node = nodes.iter_mut().find(|node| node.id == grab.node_id)?;
        let target = self.bounds.clamp(pointer - grab.offset);
        node.x = target.x;
        node.y = target.y;
        Some(target)
    }

    pub fn end(&self, drag: &mut DragState) {
        drag.grab = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RenderConfig, ViewportConfig};
    use crate::model::NodeType;
    use crate::viewport::{ViewportController, ViewportState};

    fn controller() -> DragController {
        DragController::new(CanvasBounds::default())
    }

    #[test]
    fn node_moves_by_pointer_delta_over_scale() {
        let viewport = ViewportController::new(&ViewportConfig::default(), &RenderConfig::default());
        for (scale, start) in [(1.0, (300.0, 200.0)), (2.0, (900.0, 700.0)), (0.5, (120.0, 640.0))] {
            let state = ViewportState {
                scale,
                scroll: Point::new(25.0, 15.0),
                ..ViewportState::default()
            };
            let mut nodes = vec![MeshNode::new("n", NodeType::Relay, start.0, start.1)];
            let mut drag = DragState::default();
            let ctl = controller();

            let grab_screen = viewport.canvas_to_screen(&state, Point::new(start.0 + 5.0, start.1 - 3.0));
            ctl.begin(&mut drag, &nodes[0], viewport.screen_to_canvas(&state, grab_screen));

            let delta = Point::new(40.0, -24.0);
            let moved = ctl.update(&drag, &mut nodes, viewport.screen_to_canvas(&state, grab_screen + delta));
            assert!(moved.is_some());
            assert!((nodes[0].x - (start.0 + delta.x / scale)).abs() < 1e-3, "scale {scale}");
            assert!((nodes[0].y - (start.1 + delta.y / scale)).abs() < 1e-3, "scale {scale}");
        }
    }

    #[test]
    fn drag_is_clamped_to_bounds() {
        let ctl = controller();
        let mut nodes = vec![MeshNode::new("n", NodeType::Gateway, 100.0, 100.0)];
        let mut drag = DragState::default();
        ctl.begin(&mut drag, &nodes[0], Point::new(100.0, 100.0));
        ctl.update(&drag, &mut nodes, Point::new(-5000.0, 99_999.0));
        assert_eq!(nodes[0].position(), Point::new(40.0, 1160.0));
    }

    #[test]
    fn end_clears_grab_and_stops_updates() {
        let ctl = controller();
        let mut nodes = vec![MeshNode::new("n", NodeType::Terminal, 100.0, 100.0)];
        let mut drag = DragState::default();
        ctl.begin(&mut drag, &nodes[0], Point::new(100.0, 100.0));
        assert!(drag.is_active());
        ctl.end(&mut drag);
        assert!(!drag.is_active());
        assert_eq!(ctl.update(&drag, &mut nodes, Point::new(500.0, 500.0)), None);
        assert_eq!(nodes[0].position(), Point::new(100.0, 100.0));
    }

    #[test]
    fn stale_grab_writes_nothing() {
        let ctl = controller();
        let grabbed = MeshNode::new("old", NodeType::Relay, 100.0, 100.0);
        let mut nodes = vec![MeshNode::new("new", NodeType::Relay, 200.0, 200.0)];
        let mut drag = DragState::default();
        ctl.begin(&mut drag, &grabbed, Point::new(100.0, 100.0));
        assert_eq!(ctl.update(&drag, &mut nodes, Point::new(300.0, 300.0)), None);
        assert_eq!(nodes[0].position(), Point::new(200.0, 200.0));
    }
}
