use serde::Serialize;

use crate::config::LinkConfig;
use crate::model::{LabelMode, MeshNode, NodeStatus, NodeType};
use crate::projector::{LinkGeometry, project_links};
use crate::session::TopologyState;
use crate::viewport::{Size, ViewportTransform};
use crate::visibility::VisibilityMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeGlyph {
    pub id: String,
    pub name: String,
    pub node_type: NodeType,
    pub status: NodeStatus,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub subtitle: String,
}

impl NodeGlyph {
    fn from_node(node: &MeshNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            node_type: node.node_type,
            status: node.status,
            x: node.x,
            y: node.y,
            radius: node.node_type.radius(),
            subtitle: format!("{} · RSSI {}dBm", node.node_type.label(), node.rssi),
        }
    }
}

/// Everything the presentation layer needs for one paint. Rebuilt from
/// state on demand, never cached.
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub topology_id: String,
    pub topology_name: String,
    pub customer_name: Option<String>,
    pub size: Size,
    pub transform: ViewportTransform,
    pub label_mode: LabelMode,
    pub nodes: Vec<NodeGlyph>,
    pub links: Vec<LinkGeometry>,
}

impl Scene {
    pub fn build(
        topology: &TopologyState,
        visibility: &VisibilityMap,
        customer_name: Option<String>,
        size: Size,
        transform: ViewportTransform,
        config: &LinkConfig,
    ) -> Self {
        let nodes = visibility
            .visible_nodes(&topology.nodes)
            .map(NodeGlyph::from_node)
            .collect();
        let links = project_links(
            &topology.nodes,
            &topology.links,
            visibility,
            topology.label_mode,
            config,
        );
        Self {
            topology_id: topology.topology_id.clone(),
            topology_name: topology.topology_name.clone(),
            customer_name,
            size,
            transform,
            label_mode: topology.label_mode,
            nodes,
            links,
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeGlyph> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
