use serde::Serialize;

use crate::model::{MeshLink, MeshNode, NodeStatus};

/// Network overview figures for the active topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TopologyStats {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub warning: usize,
    /// Online share of all nodes, percent, rounded.
    pub coverage: u32,
    /// Mean over links reporting latency > 0, ms, rounded.
    pub avg_latency: u32,
    /// MHz, rounded.
    pub avg_frequency: u32,
    pub link_count: usize,
}

pub fn compute_stats(nodes: &[MeshNode], links: &[MeshLink]) -> TopologyStats {
    let count = |status: NodeStatus| nodes.iter().filter(|n| n.status == status).count();
    let total = nodes.len();
    let online = count(NodeStatus::Online);

    let latencies: Vec<f32> = links.iter().map(|l| l.latency).filter(|l| *l > 0.0).collect();
    let avg_latency = latencies.iter().sum::<f32>() / latencies.len().max(1) as f32;
    let avg_frequency = if nodes.is_empty() {
        0.0
    } else {
        nodes.iter().map(|n| n.frequency).sum::<f32>() / total as f32
    };

    TopologyStats {
        total,
        online,
        offline: count(NodeStatus::Offline),
        warning: count(NodeStatus::Warning),
        coverage: (online as f32 / total.max(1) as f32 * 100.0).round() as u32,
        avg_latency: avg_latency.round().max(0.0) as u32,
        avg_frequency: avg_frequency.round().max(0.0) as u32,
        link_count: links.len(),
    }
}

pub fn format_frequency(mhz: u32) -> String {
    if mhz >= 1000 {
        format!("{:.1} GHz", mhz as f32 / 1000.0)
    } else {
        format!("{mhz} MHz")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;

    #[test]
    fn stats_over_small_mesh() {
        let mut a = MeshNode::new("a", NodeType::Gateway, 0.0, 0.0);
        a.frequency = 2400.0;
        let mut b = MeshNode::new("b", NodeType::Relay, 0.0, 0.0);
        b.status = NodeStatus::Offline;
        b.frequency = 2450.0;
        let mut c = MeshNode::new("c", NodeType::Terminal, 0.0, 0.0);
        c.status = NodeStatus::Warning;
        c.frequency = 2480.0;

        let mut l1 = MeshLink::new("l1", "a", "b", 10.0);
        l1.latency = 8.0;
        let mut l2 = MeshLink::new("l2", "a", "c", 10.0);
        l2.latency = 15.0;
        let l3 = MeshLink::new("l3", "b", "c", 0.0);

        let stats = compute_stats(&[a, b, c], &[l1, l2, l3]);
        assert_eq!(stats.total, 3);
        assert_eq!((stats.online, stats.offline, stats.warning), (1, 1, 1));
        assert_eq!(stats.coverage, 33);
        assert_eq!(stats.avg_latency, 12);
        assert_eq!(stats.avg_frequency, 2443);
        assert_eq!(stats.link_count, 3);
    }

    #[test]
    fn empty_topology_has_zero_stats() {
        assert_eq!(compute_stats(&[], &[]), TopologyStats::default());
    }

    #[test]
    fn frequency_formatting() {
        assert_eq!(format_frequency(2400), "2.4 GHz");
        assert_eq!(format_frequency(5800), "5.8 GHz");
        assert_eq!(format_frequency(900), "900 MHz");
    }
}
