use crate::model::{LabelMode, LinkActivity, NodeStatus, NodeType};
use crate::scene::Scene;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub topology: String,
    pub customer: Option<String>,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub label_mode: LabelMode,
    pub nodes: Vec<NodeDump>,
    pub links: Vec<LinkDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub node_type: NodeType,
    pub status: NodeStatus,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Debug, Serialize)]
pub struct LinkDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub activity: LinkActivity,
    pub stroke_width: f32,
    pub uplink: [[f32; 2]; 2],
    pub downlink: [[f32; 2]; 2],
    pub label: Option<String>,
}

impl LayoutDump {
    pub fn from_scene(scene: &Scene) -> Self {
        let nodes = scene
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                node_type: node.node_type,
                status: node.status,
                x: node.x,
                y: node.y,
                radius: node.radius,
            })
            .collect();

        let links = scene
            .links
            .iter()
            .map(|link| LinkDump {
                id: link.link_id.clone(),
                source: link.source.clone(),
                target: link.target.clone(),
                activity: link.activity,
                stroke_width: link.stroke_width,
                uplink: [
                    [link.uplink.from.x, link.uplink.from.y],
                    [link.uplink.to.x, link.uplink.to.y],
                ],
                downlink: [
                    [link.downlink.from.x, link.downlink.from.y],
                    [link.downlink.to.x, link.downlink.to.y],
                ],
                label: link.label.as_ref().map(|label| label.text.clone()),
            })
            .collect();

        LayoutDump {
            topology: scene.topology_id.clone(),
            customer: scene.customer_name.clone(),
            width: scene.size.width,
            height: scene.size.height,
            scale: scene.transform.scale,
            label_mode: scene.label_mode,
            nodes,
            links,
        }
    }
}

pub fn write_layout_dump(path: &Path, scene: &Scene) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_scene(scene);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::Session;
    use crate::store::TopologyStore;

    #[test]
    fn dump_mirrors_scene() {
        let session = Session::new(TopologyStore::sample(), Config::default()).unwrap();
        let scene = session.scene();
        let dump = LayoutDump::from_scene(&scene);
        assert_eq!(dump.topology, "topo-c1-1");
        assert_eq!(dump.nodes.len(), scene.nodes.len());
        assert_eq!(dump.links.len(), scene.links.len());
        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["label_mode"], "latency");
        assert_eq!(json["nodes"][0]["node_type"], "gateway");
    }
}
