use crate::model::Point;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rectangle every layout and drag result is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl CanvasBounds {
    /// NaN lands on the minimum edge; infinities on the nearest edge.
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            clamp_axis(point.x, self.min_x, self.max_x),
            clamp_axis(point.y, self.min_y, self.max_y),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    fn normalized(mut self) -> Self {
        if self.min_x > self.max_x {
            std::mem::swap(&mut self.min_x, &mut self.max_x);
        }
        if self.min_y > self.max_y {
            std::mem::swap(&mut self.min_y, &mut self.max_y);
        }
        self
    }
}

fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self {
            min_x: 40.0,
            max_x: 1760.0,
            min_y: 40.0,
            max_y: 1160.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub max_spacing: f32,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1600.0,
            canvas_height: 1000.0,
            max_spacing: 220.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceConfig {
    pub iterations: usize,
    pub repulsion: f32,
    pub attraction: f32,
    pub max_step: f32,
    pub min_distance: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            iterations: 40,
            repulsion: 1000.0,
            attraction: 0.02,
            max_step: 6.0,
            min_distance: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub bounds: CanvasBounds,
    pub hierarchy: HierarchyConfig,
    pub force: ForceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub zoom_step: f32,
    pub wheel_sensitivity: f32,
    pub sidebar_width: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.3,
            max_scale: 3.0,
            zoom_step: 1.2,
            wheel_sensitivity: 0.0015,
            sidebar_width: 350.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Perpendicular distance between the link axis and each traffic lane.
    pub lane_offset: f32,
    pub start_clearance: f32,
    pub end_clearance: f32,
    pub min_width: f32,
    pub max_width: f32,
    /// Mbps per extra unit of stroke width above `min_width`.
    pub bandwidth_per_width: f32,
    pub inactive_width: f32,
    pub uplink_opacity: f32,
    pub downlink_opacity: f32,
    pub inactive_uplink_opacity: f32,
    pub inactive_downlink_opacity: f32,
    pub inactive_dasharray: String,
    pub label_lift: f32,
    pub label_background: bool,
    pub label_padding_x: f32,
    pub label_padding_y: f32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            lane_offset: 4.0,
            start_clearance: 2.0,
            end_clearance: 4.0,
            min_width: 2.0,
            max_width: 4.0,
            bandwidth_per_width: 30.0,
            inactive_width: 1.5,
            uplink_opacity: 0.9,
            downlink_opacity: 0.8,
            inactive_uplink_opacity: 0.6,
            inactive_downlink_opacity: 0.5,
            inactive_dasharray: "4,2".to_string(),
            label_lift: 6.0,
            label_background: true,
            label_padding_x: 4.0,
            label_padding_y: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1800.0,
            height: 1200.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub links: LinkConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::dark(),
            layout: LayoutConfig::default(),
            viewport: ViewportConfig::default(),
            links: LinkConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    label_font_size: Option<f32>,
    background: Option<String>,
    text_color: Option<String>,
    secondary_text_color: Option<String>,
    gateway_color: Option<String>,
    relay_color: Option<String>,
    terminal_color: Option<String>,
    online_color: Option<String>,
    offline_color: Option<String>,
    warning_color: Option<String>,
    uplink_color: Option<String>,
    downlink_color: Option<String>,
    inactive_link_color: Option<String>,
    link_label_color: Option<String>,
    link_label_background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    bounds: Option<CanvasBounds>,
    canvas_width: Option<f32>,
    canvas_height: Option<f32>,
    max_spacing: Option<f32>,
    iterations: Option<usize>,
    repulsion: Option<f32>,
    attraction: Option<f32>,
    max_step: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ViewportConfigFile {
    min_scale: Option<f32>,
    max_scale: Option<f32>,
    zoom_step: Option<f32>,
    wheel_sensitivity: Option<f32>,
    sidebar_width: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LinkConfigFile {
    lane_offset: Option<f32>,
    start_clearance: Option<f32>,
    end_clearance: Option<f32>,
    min_width: Option<f32>,
    max_width: Option<f32>,
    bandwidth_per_width: Option<f32>,
    inactive_width: Option<f32>,
    inactive_dasharray: Option<String>,
    label_lift: Option<f32>,
    label_background: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    viewport: Option<ViewportConfigFile>,
    links: Option<LinkConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "light" {
            config.theme = Theme::light();
        } else if theme_name == "dark" || theme_name == "default" {
            config.theme = Theme::dark();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.label_font_size {
            config.theme.label_font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.secondary_text_color {
            config.theme.secondary_text_color = v;
        }
        if let Some(v) = vars.gateway_color {
            config.theme.gateway_color = v;
        }
        if let Some(v) = vars.relay_color {
            config.theme.relay_color = v;
        }
        if let Some(v) = vars.terminal_color {
            config.theme.terminal_color = v;
        }
        if let Some(v) = vars.online_color {
            config.theme.online_color = v;
        }
        if let Some(v) = vars.offline_color {
            config.theme.offline_color = v;
        }
        if let Some(v) = vars.warning_color {
            config.theme.warning_color = v;
        }
        if let Some(v) = vars.uplink_color {
            config.theme.uplink_color = v;
        }
        if let Some(v) = vars.downlink_color {
            config.theme.downlink_color = v;
        }
        if let Some(v) = vars.inactive_link_color {
            config.theme.inactive_link_color = v;
        }
        if let Some(v) = vars.link_label_color {
            config.theme.link_label_color = v;
        }
        if let Some(v) = vars.link_label_background {
            config.theme.link_label_background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.bounds {
            config.layout.bounds = v.normalized();
        }
        if let Some(v) = layout.canvas_width {
            config.layout.hierarchy.canvas_width = v.max(1.0);
        }
        if let Some(v) = layout.canvas_height {
            config.layout.hierarchy.canvas_height = v.max(1.0);
        }
        if let Some(v) = layout.max_spacing {
            config.layout.hierarchy.max_spacing = v.max(0.0);
        }
        if let Some(v) = layout.iterations {
            config.layout.force.iterations = v;
        }
        if let Some(v) = layout.repulsion {
            config.layout.force.repulsion = v;
        }
        if let Some(v) = layout.attraction {
            config.layout.force.attraction = v;
        }
        if let Some(v) = layout.max_step {
            config.layout.force.max_step = v.abs();
        }
    }

    if let Some(viewport) = parsed.viewport {
        if let Some(v) = viewport.min_scale {
            config.viewport.min_scale = v;
        }
        if let Some(v) = viewport.max_scale {
            config.viewport.max_scale = v;
        }
        if let Some(v) = viewport.zoom_step {
            config.viewport.zoom_step = v;
        }
        if let Some(v) = viewport.wheel_sensitivity {
            config.viewport.wheel_sensitivity = v;
        }
        if let Some(v) = viewport.sidebar_width {
            config.viewport.sidebar_width = v.max(0.0);
        }
        // Scale must stay positive and the range ordered.
        config.viewport.min_scale = config.viewport.min_scale.max(0.01);
        if config.viewport.max_scale < config.viewport.min_scale {
            std::mem::swap(&mut config.viewport.min_scale, &mut config.viewport.max_scale);
            config.viewport.min_scale = config.viewport.min_scale.max(0.01);
        }
        if config.viewport.zoom_step <= 1.0 {
            config.viewport.zoom_step = ViewportConfig::default().zoom_step;
        }
    }

    if let Some(links) = parsed.links {
        if let Some(v) = links.lane_offset {
            config.links.lane_offset = v;
        }
        if let Some(v) = links.start_clearance {
            config.links.start_clearance = v;
        }
        if let Some(v) = links.end_clearance {
            config.links.end_clearance = v;
        }
        if let Some(v) = links.min_width {
            config.links.min_width = v;
        }
        if let Some(v) = links.max_width {
            config.links.max_width = v;
        }
        if let Some(v) = links.bandwidth_per_width {
            config.links.bandwidth_per_width = v;
        }
        if let Some(v) = links.inactive_width {
            config.links.inactive_width = v;
        }
        if let Some(v) = links.inactive_dasharray {
            config.links.inactive_dasharray = v;
        }
        if let Some(v) = links.label_lift {
            config.links.label_lift = v;
        }
        if let Some(v) = links.label_background {
            config.links.label_background = v;
        }
        if config.links.max_width < config.links.min_width {
            config.links.max_width = config.links.min_width;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v.max(1.0);
        }
        if let Some(v) = render.height {
            config.render.height = v.max(1.0);
        }
    }

    Ok(config)
}
