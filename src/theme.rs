use crate::model::{NodeStatus, NodeType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub label_font_size: f32,
    pub background: String,
    pub text_color: String,
    pub secondary_text_color: String,
    pub gateway_color: String,
    pub relay_color: String,
    pub terminal_color: String,
    pub online_color: String,
    pub offline_color: String,
    pub warning_color: String,
    pub uplink_color: String,
    pub downlink_color: String,
    pub inactive_link_color: String,
    pub link_label_color: String,
    pub link_label_background: String,
}

impl Theme {
    /// Dark monitoring-console palette.
    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            label_font_size: 10.0,
            background: "#0A1628".to_string(),
            text_color: "#FFFFFF".to_string(),
            secondary_text_color: "#8C8C8C".to_string(),
            gateway_color: "#1890FF".to_string(),
            relay_color: "#722ED1".to_string(),
            terminal_color: "#13C2C2".to_string(),
            online_color: "#52C41A".to_string(),
            offline_color: "#FF4D4F".to_string(),
            warning_color: "#FAAD14".to_string(),
            uplink_color: "#40A9FF".to_string(),
            downlink_color: "#36CFC9".to_string(),
            inactive_link_color: "#FF4D4F".to_string(),
            link_label_color: "#8C8C8C".to_string(),
            link_label_background: "rgba(0,21,41,0.65)".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            label_font_size: 10.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            secondary_text_color: "#7A8AA6".to_string(),
            gateway_color: "#1890FF".to_string(),
            relay_color: "#722ED1".to_string(),
            terminal_color: "#13C2C2".to_string(),
            online_color: "#52C41A".to_string(),
            offline_color: "#FF4D4F".to_string(),
            warning_color: "#FAAD14".to_string(),
            uplink_color: "#1677FF".to_string(),
            downlink_color: "#08979C".to_string(),
            inactive_link_color: "#F5222D".to_string(),
            link_label_color: "#595959".to_string(),
            link_label_background: "rgba(255,255,255,0.8)".to_string(),
        }
    }

    pub fn node_fill(&self, node_type: NodeType) -> &str {
        match node_type {
            NodeType::Gateway => &self.gateway_color,
            NodeType::Relay => &self.relay_color,
            NodeType::Terminal => &self.terminal_color,
        }
    }

    pub fn status_color(&self, status: NodeStatus) -> &str {
        match status {
            NodeStatus::Online => &self.online_color,
            NodeStatus::Offline => &self.offline_color,
            NodeStatus::Warning => &self.warning_color,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
