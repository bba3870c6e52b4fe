mod force;
mod hierarchy;

use force::*;
use hierarchy::*;

use crate::config::LayoutConfig;
use crate::model::{LayoutMode, MeshLink, MeshNode};

/// Computes new coordinates for `nodes` under `mode`.
///
/// Pure: the inputs are never mutated and the returned vector has the same
/// length and order as `nodes`, with only `x`/`y` changed. Every returned
/// position lies inside `config.bounds`.
pub fn compute_layout(
    nodes: &[MeshNode],
    links: &[MeshLink],
    mode: LayoutMode,
    config: &LayoutConfig,
) -> Vec<MeshNode> {
    let positions = match mode {
        LayoutMode::Hierarchy => compute_hierarchy_positions(nodes, config),
        LayoutMode::Force => compute_force_positions(nodes, links, config),
    };

    nodes
        .iter()
        .zip(positions)
        .map(|(node, point)| {
            let point = config.bounds.clamp(point);
            MeshNode {
                x: point.x,
                y: point.y,
                ..node.clone()
            }
        })
        .collect()
}
