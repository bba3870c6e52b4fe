use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{MeshLink, MeshNode, NodeStatus, NodeType};

/// Per-node canvas visibility. Ids without an entry are visible.
#[derive(Debug, Clone, Default)]
pub struct VisibilityMap {
    flags: HashMap<String, bool>,
}

impl VisibilityMap {
    pub fn all_visible(nodes: &[MeshNode]) -> Self {
        Self {
            flags: nodes.iter().map(|node| (node.id.clone(), true)).collect(),
        }
    }

    pub fn reset(&mut self, nodes: &[MeshNode]) {
        *self = Self::all_visible(nodes);
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.flags.get(id).copied().unwrap_or(true)
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) {
        self.flags.insert(id.to_string(), visible);
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_visible(id);
        self.set_visible(id, next);
        next
    }

    pub fn hidden_count(&self) -> usize {
        self.flags.values().filter(|visible| !**visible).count()
    }

    /// A link is drawn only when both endpoints are drawn.
    pub fn link_visible(&self, link: &MeshLink) -> bool {
        self.is_visible(&link.source) && self.is_visible(&link.target)
    }

    pub fn visible_nodes<'a>(&'a self, nodes: &'a [MeshNode]) -> impl Iterator<Item = &'a MeshNode> + 'a {
        nodes.iter().filter(|node| self.is_visible(&node.id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Online,
    Offline,
    Warning,
}

impl StatusFilter {
    fn matches(self, status: NodeStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Online => status == NodeStatus::Online,
            StatusFilter::Offline => status == NodeStatus::Offline,
            StatusFilter::Warning => status == NodeStatus::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Gateway,
    Relay,
    Terminal,
}

impl TypeFilter {
    fn matches(self, node_type: NodeType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Gateway => node_type == NodeType::Gateway,
            TypeFilter::Relay => node_type == NodeType::Relay,
            TypeFilter::Terminal => node_type == NodeType::Terminal,
        }
    }
}

/// Scopes the side list. Has no effect on what the canvas draws.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFilter {
    pub status: StatusFilter,
    pub node_type: TypeFilter,
    pub keyword: String,
}

impl NodeFilter {
    pub fn matches(&self, node: &MeshNode) -> bool {
        self.status.matches(node.status)
            && self.node_type.matches(node.node_type)
            && (self.keyword.is_empty()
                || node.name.contains(&self.keyword)
                || node.ip.contains(&self.keyword)
                || node.mac.contains(&self.keyword))
    }

    pub fn apply<'a>(&self, nodes: &'a [MeshNode]) -> Vec<&'a MeshNode> {
        nodes.iter().filter(|node| self.matches(node)).collect()
    }
}
