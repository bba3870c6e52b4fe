use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::model::{MeshLink, MeshNode, Point};

/// Fixed-iteration spring embedder.
///
/// Every pass sums inverse-square repulsion over all node pairs and Hookean
/// attraction along links, clamps each force axis to `max_step` and applies
/// it as a position delta. There is no velocity term and no convergence test.
pub(super) fn compute_force_positions(
    nodes: &[MeshNode],
    links: &[MeshLink],
    config: &LayoutConfig,
) -> Vec<Point> {
    let force = &config.force;
    // A single non-finite start would turn every pairwise push into NaN.
    let mut positions: Vec<Point> = nodes
        .iter()
        .map(|node| {
            let position = node.position();
            if position.is_finite() {
                position
            } else {
                config.bounds.clamp(position)
            }
        })
        .collect();
    if positions.is_empty() {
        return positions;
    }

    let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        index_of.entry(node.id.as_str()).or_insert(idx);
    }
    // Links with an unresolved endpoint exert no force.
    let springs: Vec<(usize, usize)> = links
        .iter()
        .filter_map(|link| {
            let from = *index_of.get(link.source.as_str())?;
            let to = *index_of.get(link.target.as_str())?;
            Some((from, to))
        })
        .collect();

    let min_distance = force.min_distance.max(f32::EPSILON);
    let mut forces = vec![Point::default(); positions.len()];

    for _ in 0..force.iterations {
        forces.iter_mut().for_each(|f| *f = Point::default());

        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let delta = positions[i] - positions[j];
                let distance = delta.x.hypot(delta.y).max(min_distance);
                let magnitude = force.repulsion / (distance * distance);
                let push = Point::new(delta.x / distance * magnitude, delta.y / distance * magnitude);
                forces[i] = forces[i] + push;
                forces[j] = forces[j] - push;
            }
        }

        for &(from, to) in &springs {
            let delta = positions[to] - positions[from];
            let distance = delta.x.hypot(delta.y).max(min_distance);
            let magnitude = force.attraction * distance;
            let pull = Point::new(delta.x / distance * magnitude, delta.y / distance * magnitude);
            forces[from] = forces[from] + pull;
            forces[to] = forces[to] - pull;
        }

        for (position, total) in positions.iter_mut().zip(&forces) {
            let step = Point::new(
                total.x.clamp(-force.max_step, force.max_step),
                total.y.clamp(-force.max_step, force.max_step),
            );
            *position = config.bounds.clamp(*position + step);
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForceConfig;
    use crate::model::NodeType;

    fn distance(a: Point, b: Point) -> f32 {
        (a.x - b.x).hypot(a.y - b.y)
    }

    #[test]
    fn linked_nodes_are_pulled_together() {
        let nodes = vec![
            MeshNode::new("a", NodeType::Gateway, 200.0, 600.0),
            MeshNode::new("b", NodeType::Relay, 1400.0, 600.0),
        ];
        let links = vec![MeshLink::new("l", "a", "b", 10.0)];
        let out = compute_force_positions(&nodes, &links, &LayoutConfig::default());
        assert!(distance(out[0], out[1]) < 1200.0);
        assert!((out[0].y - 600.0).abs() < 1e-3);
    }

    #[test]
    fn unlinked_close_nodes_are_pushed_apart() {
        let nodes = vec![
            MeshNode::new("a", NodeType::Terminal, 900.0, 600.0),
            MeshNode::new("b", NodeType::Terminal, 905.0, 600.0),
        ];
        let out = compute_force_positions(&nodes, &[], &LayoutConfig::default());
        assert!(distance(out[0], out[1]) > 5.0);
        assert!(out[0].x < 900.0 && out[1].x > 905.0);
    }

    #[test]
    fn each_pass_moves_at_most_max_step_per_axis() {
        let config = LayoutConfig {
            force: ForceConfig {
                iterations: 1,
                repulsion: 1.0e9,
                ..ForceConfig::default()
            },
            ..LayoutConfig::default()
        };
        let nodes = vec![
            MeshNode::new("a", NodeType::Relay, 800.0, 600.0),
            MeshNode::new("b", NodeType::Relay, 810.0, 610.0),
        ];
        let out = compute_force_positions(&nodes, &[], &config);
        for (before, after) in nodes.iter().zip(&out) {
            assert!((after.x - before.x).abs() <= 6.0 + 1e-4);
            assert!((after.y - before.y).abs() <= 6.0 + 1e-4);
        }
    }

    #[test]
    fn dangling_link_is_ignored() {
        let nodes = vec![MeshNode::new("a", NodeType::Gateway, 800.0, 600.0)];
        let links = vec![MeshLink::new("l", "a", "missing", 10.0)];
        let out = compute_force_positions(&nodes, &links, &LayoutConfig::default());
        assert_eq!(out[0], Point::new(800.0, 600.0));
    }

    #[test]
    fn non_finite_start_does_not_spread() {
        let nodes = vec![
            MeshNode::new("a", NodeType::Gateway, f32::INFINITY, 200.0),
            MeshNode::new("b", NodeType::Relay, 600.0, f32::NAN),
            MeshNode::new("c", NodeType::Terminal, 700.0, 700.0),
        ];
        let links = vec![MeshLink::new("ab", "a", "b", 10.0), MeshLink::new("bc", "b", "c", 10.0)];
        let config = LayoutConfig::default();
        let out = compute_force_positions(&nodes, &links, &config);
        for point in &out {
            assert!(point.is_finite(), "{point:?}");
            assert!(config.bounds.contains(*point), "{point:?}");
        }
    }

    #[test]
    fn zero_iterations_only_keeps_input() {
        let config = LayoutConfig {
            force: ForceConfig {
                iterations: 0,
                ..ForceConfig::default()
            },
            ..LayoutConfig::default()
        };
        let nodes = vec![MeshNode::new("a", NodeType::Gateway, 5.0, 5.0)];
        let out = compute_force_positions(&nodes, &[], &config);
        assert_eq!(out[0], Point::new(5.0, 5.0));
    }
}
