use crate::config::LayoutConfig;
use crate::model::{MeshNode, Point};

/// Places nodes on three horizontal layers (gateway, relay, terminal).
///
/// Layer `k` sits at `canvas_height / 4 * (k + 1)`. Inside a layer nodes keep
/// their input order and are spread evenly around the horizontal center.
pub(super) fn compute_hierarchy_positions(nodes: &[MeshNode], config: &LayoutConfig) -> Vec<Point> {
    let canvas_width = config.hierarchy.canvas_width;
    let layer_height = config.hierarchy.canvas_height / 4.0;

    let mut layer_sizes = [0usize; 3];
    for node in nodes {
        layer_sizes[node.node_type.layer()] += 1;
    }

    let spacing_for = |size: usize| -> f32 {
        config
            .hierarchy
            .max_spacing
            .min(canvas_width / (size as f32 + 1.0))
    };
    let spacings: [f32; 3] = std::array::from_fn(|layer| spacing_for(layer_sizes[layer]));
    let starts: [f32; 3] = std::array::from_fn(|layer| {
        let size = layer_sizes[layer];
        if size == 0 {
            return 0.0;
        }
        (canvas_width - (size as f32 - 1.0) * spacings[layer]) / 2.0
    });

    let mut cursor = [0usize; 3];
    nodes
        .iter()
        .map(|node| {
            let layer = node.node_type.layer();
            let index = cursor[layer];
            cursor[layer] += 1;
            Point::new(
                starts[layer] + index as f32 * spacings[layer],
                layer_height * (layer as f32 + 1.0),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;

    fn node(id: &str, node_type: NodeType) -> MeshNode {
        MeshNode::new(id, node_type, 0.0, 0.0)
    }

    #[test]
    fn gateway_centered_relays_symmetric() {
        let nodes = vec![
            node("r1", NodeType::Relay),
            node("g", NodeType::Gateway),
            node("r2", NodeType::Relay),
        ];
        let points = compute_hierarchy_positions(&nodes, &LayoutConfig::default());
        assert_eq!(points[1], Point::new(800.0, 250.0));
        assert_eq!(points[0], Point::new(690.0, 500.0));
        assert_eq!(points[2], Point::new(910.0, 500.0));
        assert_eq!(800.0 - points[0].x, points[2].x - 800.0);
    }

    #[test]
    fn crowded_layer_shrinks_spacing() {
        let nodes: Vec<MeshNode> = (0..9)
            .map(|i| node(&format!("t{i}"), NodeType::Terminal))
            .collect();
        let points = compute_hierarchy_positions(&nodes, &LayoutConfig::default());
        let spacing = points[1].x - points[0].x;
        assert!((spacing - 160.0).abs() < 1e-3);
        assert!(points.iter().all(|p| p.y == 750.0));
        let mid = (points[0].x + points[8].x) / 2.0;
        assert!((mid - 800.0).abs() < 1e-3);
    }

    #[test]
    fn deterministic_for_same_input() {
        let nodes = vec![
            node("a", NodeType::Terminal),
            node("b", NodeType::Gateway),
            node("c", NodeType::Terminal),
        ];
        let config = LayoutConfig::default();
        assert_eq!(
            compute_hierarchy_positions(&nodes, &config),
            compute_hierarchy_positions(&nodes, &config)
        );
    }
}
