use std::collections::HashMap;

use serde::Serialize;

use crate::config::LinkConfig;
use crate::model::{LabelMode, LinkActivity, MeshLink, MeshNode, Point};
use crate::visibility::VisibilityMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkLabel {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// Drawable form of one link: two parallel lanes, uplink running
/// source → target and downlink target → source, each ending in an arrow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkGeometry {
    pub link_id: String,
    pub source: String,
    pub target: String,
    pub activity: LinkActivity,
    pub uplink: Segment,
    pub downlink: Segment,
    pub stroke_width: f32,
    pub uplink_opacity: f32,
    pub downlink_opacity: f32,
    pub dashed: bool,
    pub label: Option<LinkLabel>,
}

/// Projects every drawable link. Links with a hidden or unresolved endpoint
/// are skipped.
pub fn project_links(
    nodes: &[MeshNode],
    links: &[MeshLink],
    visibility: &VisibilityMap,
    label_mode: LabelMode,
    config: &LinkConfig,
) -> Vec<LinkGeometry> {
    let by_id: HashMap<&str, &MeshNode> = nodes.iter().map(|node| (node.id.as_str(), node)).collect();
    links
        .iter()
        .filter(|link| visibility.link_visible(link))
        .filter_map(|link| {
            let source = by_id.get(link.source.as_str())?;
            let target = by_id.get(link.target.as_str())?;
            Some(project_link(source, target, link, label_mode, config))
        })
        .collect()
}

pub fn project_link(
    source: &MeshNode,
    target: &MeshNode,
    link: &MeshLink,
    label_mode: LabelMode,
    config: &LinkConfig,
) -> LinkGeometry {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let len = dx.hypot(dy).max(1.0);
    let unit = Point::new(dx / len, dy / len);
    let normal = Point::new(-dy / len, dx / len);
    let lane = Point::new(normal.x * config.lane_offset, normal.y * config.lane_offset);
    let r_source = source.node_type.radius();
    let r_target = target.node_type.radius();

    let along = |origin: Point, distance: f32| Point::new(origin.x + unit.x * distance, origin.y + unit.y * distance);

    let s = source.position();
    let t = target.position();
    let uplink = Segment {
        from: along(s + lane, r_source + config.start_clearance),
        to: along(t + lane, -(r_target + config.end_clearance)),
    };
    let downlink = Segment {
        from: along(t - lane, -(r_target + config.start_clearance)),
        to: along(s - lane, r_source + config.end_clearance),
    };

    let activity = link.activity();
    let (uplink_opacity, downlink_opacity) = match activity {
        LinkActivity::Active => (config.uplink_opacity, config.downlink_opacity),
        LinkActivity::Down => (config.inactive_uplink_opacity, config.inactive_downlink_opacity),
    };

    let label = label_text(link, label_mode).map(|text| LinkLabel {
        x: (s.x + t.x) / 2.0,
        y: (s.y + t.y) / 2.0 - config.label_lift,
        text,
    });

    LinkGeometry {
        link_id: link.id.clone(),
        source: link.source.clone(),
        target: link.target.clone(),
        activity,
        uplink,
        downlink,
        stroke_width: stroke_width(link, config),
        uplink_opacity,
        downlink_opacity,
        dashed: activity == LinkActivity::Down,
        label,
    }
}

pub fn stroke_width(link: &MeshLink, config: &LinkConfig) -> f32 {
    match link.activity() {
        LinkActivity::Active => {
            let per = config.bandwidth_per_width.max(f32::EPSILON);
            (config.min_width + link.bandwidth / per).clamp(config.min_width, config.max_width)
        }
        LinkActivity::Down => config.inactive_width,
    }
}

pub fn label_text(link: &MeshLink, mode: LabelMode) -> Option<String> {
    match mode {
        LabelMode::Latency => Some(format!("{}ms", link.latency)),
        LabelMode::Distance => Some(format!("{}m", link.distance)),
        LabelMode::Rssi => Some(format!("{}dBm", link.rssi)),
        LabelMode::Bandwidth => Some(format!("{}Mbps", link.bandwidth)),
        LabelMode::None => None,
    }
}
