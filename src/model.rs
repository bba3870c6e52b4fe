use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Gateway,
    Relay,
    Terminal,
}

impl NodeType {
    pub const ALL: [NodeType; 3] = [NodeType::Gateway, NodeType::Relay, NodeType::Terminal];

    /// Glyph radius, also used as the arrowhead stand-off for links.
    pub fn radius(self) -> f32 {
        match self {
            NodeType::Gateway => 20.0,
            NodeType::Relay => 16.0,
            NodeType::Terminal => 12.0,
        }
    }

    /// Vertical layer in the hierarchical layout, top to bottom.
    pub fn layer(self) -> usize {
        match self {
            NodeType::Gateway => 0,
            NodeType::Relay => 1,
            NodeType::Terminal => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeType::Gateway => "Gateway",
            NodeType::Relay => "Relay",
            NodeType::Terminal => "Terminal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Online,
    Offline,
    Warning,
}

impl NodeStatus {
    pub fn label(self) -> &'static str {
        match self {
            NodeStatus::Online => "Online",
            NodeStatus::Offline => "Offline",
            NodeStatus::Warning => "Warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerCategory {
    Enterprise,
    Government,
    Education,
    Healthcare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Force,
    Hierarchy,
}

impl LayoutMode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "force" | "force-directed" => Some(Self::Force),
            "hierarchy" | "hierarchical" => Some(Self::Hierarchy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    Latency,
    Distance,
    Rssi,
    Bandwidth,
    None,
}

impl LabelMode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "latency" => Some(Self::Latency),
            "distance" => Some(Self::Distance),
            "rssi" => Some(Self::Rssi),
            "bandwidth" => Some(Self::Bandwidth),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: CustomerCategory,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub device_count: u32,
    pub status: CustomerStatus,
    #[serde(default)]
    pub create_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub status: NodeStatus,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub ip: String,
    /// Neighbour ids. Expected to be symmetric, may dangle.
    #[serde(default)]
    pub links: Vec<String>,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub rssi: f32,
    /// MHz
    #[serde(default)]
    pub frequency: f32,
}

impl MeshNode {
    pub fn new(id: &str, node_type: NodeType, x: f32, y: f32) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            node_type,
            status: NodeStatus::Online,
            mac: String::new(),
            ip: String::new(),
            links: Vec::new(),
            x,
            y,
            rssi: 0.0,
            frequency: 0.0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshLink {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Mbps, zero means the link is down.
    pub bandwidth: f32,
    pub latency: f32,
    pub distance: f32,
    pub rssi: f32,
    #[serde(default)]
    pub customer_id: String,
}

impl MeshLink {
    pub fn new(id: &str, source: &str, target: &str, bandwidth: f32) -> Self {
        Self {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            bandwidth,
            latency: 0.0,
            distance: 0.0,
            rssi: 0.0,
            customer_id: String::new(),
        }
    }

    pub fn activity(&self) -> LinkActivity {
        if self.bandwidth > 0.0 {
            LinkActivity::Active
        } else {
            LinkActivity::Down
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkActivity {
    Active,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyMap {
    pub id: String,
    pub name: String,
    pub customer_id: String,
    pub nodes: Vec<MeshNode>,
    pub links: Vec<MeshLink>,
    pub layout_preference: LayoutMode,
    pub label_mode: LabelMode,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub create_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_deserializes_from_camel_case_record() {
        let json = r#"{
            "id": "n1", "name": "HQ gateway", "type": "gateway", "status": "warning",
            "mac": "AA:BB", "ip": "10.0.0.1", "links": ["n2"], "x": 300, "y": 200,
            "rssi": -45, "frequency": 2400
        }"#;
        let node: MeshNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_type, NodeType::Gateway);
        assert_eq!(node.status, NodeStatus::Warning);
        assert_eq!(node.links, vec!["n2".to_string()]);
        assert_eq!(node.position(), Point::new(300.0, 200.0));
    }

    #[test]
    fn zero_bandwidth_link_is_down() {
        assert_eq!(MeshLink::new("l", "a", "b", 0.0).activity(), LinkActivity::Down);
        assert_eq!(MeshLink::new("l", "a", "b", 12.0).activity(), LinkActivity::Active);
    }

    #[test]
    fn mode_tokens() {
        assert_eq!(LayoutMode::from_token("Hierarchical"), Some(LayoutMode::Hierarchy));
        assert_eq!(LabelMode::from_token("rssi"), Some(LabelMode::Rssi));
        assert_eq!(LabelMode::from_token("jitter"), None);
    }
}
