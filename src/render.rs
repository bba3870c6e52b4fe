use crate::config::LinkConfig;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::model::LinkActivity;
use crate::projector::{LinkGeometry, LinkLabel, Segment};
use crate::scene::{NodeGlyph, Scene};
use crate::text_metrics::text_width;
use crate::theme::Theme;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|\s\x00-\x1f]+"#).expect("static pattern"));

const HALO_GROWTH: f32 = 1.5;
const HALO_OPACITY: f32 = 0.15;
const NODE_STROKE_WIDTH: f32 = 2.0;
const NODE_TEXT_GAP: f32 = 6.0;

pub fn render_svg(scene: &Scene, theme: &Theme, config: &LinkConfig) -> String {
    let mut svg = String::new();
    let width = scene.size.width.max(1.0);
    let height = scene.size.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    svg.push_str("<defs>");
    for (id, color) in [
        ("arrow-up", &theme.uplink_color),
        ("arrow-down", &theme.downlink_color),
        ("arrow-inactive", &theme.inactive_link_color),
    ] {
        svg.push_str(&format!(
            "<marker id=\"{id}\" markerWidth=\"4\" markerHeight=\"4\" refX=\"4\" refY=\"2\" orient=\"auto\"><path d=\"M0,0 L4,2 L0,4 Z\" fill=\"{}\"/></marker>",
            escape_xml(color)
        ));
    }
    svg.push_str("</defs>");

    let t = scene.transform;
    svg.push_str(&format!(
        "<g transform=\"translate({:.2} {:.2}) scale({:.4})\">",
        t.translate_x, t.translate_y, t.scale
    ));

    for link in &scene.links {
        link_svg(&mut svg, link, theme, config);
    }
    for node in &scene.nodes {
        node_svg(&mut svg, node, theme);
    }

    svg.push_str("</g></svg>");
    svg
}

fn link_svg(svg: &mut String, link: &LinkGeometry, theme: &Theme, config: &LinkConfig) {
    let (up_color, down_color, up_marker, down_marker) = match link.activity {
        LinkActivity::Active => (
            &theme.uplink_color,
            &theme.downlink_color,
            "arrow-up",
            "arrow-down",
        ),
        LinkActivity::Down => (
            &theme.inactive_link_color,
            &theme.inactive_link_color,
            "arrow-inactive",
            "arrow-inactive",
        ),
    };
    let dash = if link.dashed {
        format!(" stroke-dasharray=\"{}\"", escape_xml(&config.inactive_dasharray))
    } else {
        String::new()
    };

    lane_svg(svg, &link.uplink, up_color, link.stroke_width, link.uplink_opacity, &dash, up_marker);
    lane_svg(
        svg,
        &link.downlink,
        down_color,
        link.stroke_width,
        link.downlink_opacity,
        &dash,
        down_marker,
    );

    if let Some(label) = &link.label {
        label_svg(svg, label, theme, config);
    }
}

fn lane_svg(
    svg: &mut String,
    lane: &Segment,
    color: &str,
    width: f32,
    opacity: f32,
    dash: &str,
    marker: &str,
) {
    svg.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{width:.2}\" opacity=\"{opacity}\"{dash} marker-end=\"url(#{marker})\"/>",
        lane.from.x,
        lane.from.y,
        lane.to.x,
        lane.to.y,
        escape_xml(color),
    ));
}

fn label_svg(svg: &mut String, label: &LinkLabel, theme: &Theme, config: &LinkConfig) {
    let size = theme.label_font_size;
    if config.label_background {
        let text_w = text_width(&label.text, size, &theme.font_family);
        let w = text_w + config.label_padding_x * 2.0;
        let h = size + config.label_padding_y * 2.0;
        // Text sits on its baseline; centre the pill on the glyph body.
        let cy = label.y - size * 0.35;
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" rx=\"{:.2}\" fill=\"{}\"/>",
            label.x - w / 2.0,
            cy - h / 2.0,
            h / 2.0,
            escape_xml(&theme.link_label_background)
        ));
    }
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" fill=\"{}\" font-family=\"{}\" font-size=\"{size}\" text-anchor=\"middle\">{}</text>",
        label.x,
        label.y,
        escape_xml(&theme.link_label_color),
        escape_xml(&theme.font_family),
        escape_xml(&label.text)
    ));
}

fn node_svg(svg: &mut String, node: &NodeGlyph, theme: &Theme) {
    let fill = escape_xml(theme.node_fill(node.node_type));
    svg.push_str(&format!(
        "<g data-node=\"{}\"><circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{fill}\" opacity=\"{HALO_OPACITY}\"/>",
        escape_xml(&node.id),
        node.x,
        node.y,
        node.radius + HALO_GROWTH,
    ));
    svg.push_str(&format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"{NODE_STROKE_WIDTH}\"/>",
        node.x,
        node.y,
        node.radius,
        escape_xml(theme.status_color(node.status)),
    ));
    let text_x = node.x + node.radius + NODE_TEXT_GAP;
    svg.push_str(&format!(
        "<text x=\"{text_x:.2}\" y=\"{:.2}\" fill=\"{}\" font-family=\"{}\" font-size=\"{}\">{}</text>",
        node.y + 4.0,
        escape_xml(&theme.text_color),
        escape_xml(&theme.font_family),
        theme.font_size,
        escape_xml(&node.name)
    ));
    svg.push_str(&format!(
        "<text x=\"{text_x:.2}\" y=\"{:.2}\" fill=\"{}\" font-family=\"{}\" font-size=\"{}\">{}</text></g>",
        node.y + 18.0,
        escape_xml(&theme.secondary_text_color),
        escape_xml(&theme.font_family),
        theme.label_font_size,
        escape_xml(&node.subtitle)
    ));
}

/// `"<customer>-<topology>.svg"` with path separators, reserved characters
/// and whitespace collapsed to `-`.
pub fn export_file_name(customer: Option<&str>, topology: &str) -> String {
    let parts: Vec<String> = customer
        .into_iter()
        .chain(std::iter::once(topology))
        .map(sanitize_file_part)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        "topology.svg".to_string()
    } else {
        format!("{}.svg", parts.join("-"))
    }
}

fn sanitize_file_part(part: &str) -> String {
    UNSAFE_FILE_CHARS
        .replace_all(part.trim(), "-")
        .trim_matches(|ch: char| ch == '-' || ch == '.')
        .to_string()
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
            debug!(path = %path.display(), bytes = svg.len(), "wrote svg");
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().to_string())
        .unwrap_or_else(|| "sans-serif".to_string());
    opt.fontdb_mut().load_system_fonts();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    debug!(path = %output.display(), "wrote png");
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::LabelMode;
    use crate::session::Session;
    use crate::store::TopologyStore;

    fn scene() -> (Scene, Config) {
        let mut session = Session::new(TopologyStore::sample(), Config::default()).unwrap();
        session.select_topology("topo-c1-3").unwrap();
        session.set_label_mode(LabelMode::Latency);
        (session.scene(), session.config().clone())
    }

    #[test]
    fn render_svg_basic() {
        let (scene, config) = scene();
        let svg = render_svg(&scene, &config.theme, &config.links);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"1800\""));
        assert!(svg.contains("id=\"arrow-up\""));
        assert_eq!(svg.matches("<circle").count(), scene.nodes.len() * 2);
        assert_eq!(svg.matches("<line").count(), scene.links.len() * 2);
        assert!(svg.contains("RSSI"));
    }

    #[test]
    fn down_links_are_dashed_with_inactive_marker() {
        let (scene, config) = scene();
        let svg = render_svg(&scene, &config.theme, &config.links);
        assert!(scene.links.iter().any(|link| link.dashed));
        assert!(svg.contains("stroke-dasharray=\"4,2\""));
        assert!(svg.contains("url(#arrow-inactive)"));
    }

    #[test]
    fn label_pill_is_optional() {
        let (scene, mut config) = scene();
        let with_pill = render_svg(&scene, &config.theme, &config.links);
        config.links.label_background = false;
        let without = render_svg(&scene, &config.theme, &config.links);
        let labels = scene.links.iter().filter(|l| l.label.is_some()).count();
        assert_eq!(
            with_pill.matches("<rect").count() - without.matches("<rect").count(),
            labels
        );
    }

    #[test]
    fn background_comes_from_theme() {
        let (scene, mut config) = scene();
        config.theme.background = "#010203".to_string();
        let svg = render_svg(&scene, &config.theme, &config.links);
        assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"#010203\"/>"));
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape_xml("R&D <hq>"), "R&amp;D &lt;hq&gt;");
    }

    #[test]
    fn export_names_are_file_safe() {
        assert_eq!(
            export_file_name(Some("Peking University"), "Campus Backbone"),
            "Peking-University-Campus-Backbone.svg"
        );
        assert_eq!(export_file_name(Some("a/b"), "c:d?"), "a-b-c-d.svg");
        assert_eq!(export_file_name(None, "Headquarters"), "Headquarters.svg");
        assert_eq!(export_file_name(Some("  "), "///"), "topology.svg");
    }
}
