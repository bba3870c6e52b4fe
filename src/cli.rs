use crate::config::{Config, load_config};
use crate::layout_dump::write_layout_dump;
use crate::model::{LabelMode, LayoutMode};
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{render_svg, write_output_svg};
use crate::session::Session;
use crate::stats::format_frequency;
use crate::store::{TopologySource, TopologyStore};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "meshtopo", version, about = "Mesh network topology layout and renderer")]
pub struct Args {
    /// Topology store (JSON or JSON5). Uses the bundled sample when omitted.
    #[arg(short = 's', long = "store", global = true)]
    pub store: Option<PathBuf>,

    /// Config JSON file (theme, themeVariables, layout, viewport, links)
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List customers and their topologies
    List,
    /// Render one topology
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Topology id. Falls back to the first topology when unknown or omitted.
    #[arg(short = 't', long = "topology")]
    pub topology: Option<String>,

    /// Layout mode override (force, hierarchy)
    #[arg(short = 'l', long = "layout", value_parser = parse_layout_mode)]
    pub layout: Option<LayoutMode>,

    /// Link label override (latency, distance, rssi, bandwidth, none)
    #[arg(long = "labels", value_parser = parse_label_mode)]
    pub labels: Option<LabelMode>,

    /// Run the active layout before rendering
    #[arg(short = 'a', long = "auto-layout")]
    pub auto_layout: bool,

    /// Hide a node on the canvas (repeatable)
    #[arg(long = "hide", value_name = "NODE_ID")]
    pub hide: Vec<String>,

    /// Zoom scale, clamped to the configured range
    #[arg(short = 'z', long = "zoom")]
    pub zoom: Option<f32>,

    /// Output file or directory. SVG goes to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Write the computed scene as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Print network statistics to stderr
    #[arg(long = "stats")]
    pub stats: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let store = match args.store.as_deref() {
        Some(path) => TopologyStore::from_path(path)?,
        None => TopologyStore::sample(),
    };

    match args.command {
        Command::List => {
            print!("{}", format_customer_tree(&store));
            Ok(())
        }
        Command::Render(render) => run_render(store, config, render),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn run_render(store: TopologyStore, config: Config, args: RenderArgs) -> Result<()> {
    let mut session = Session::new(store, config)?;
    if let Some(id) = args.topology.as_deref() {
        let selection = session.select_topology(id)?;
        if !selection.is_exact() {
            eprintln!(
                "warning: topology '{id}' not found, using '{}'",
                selection.topology_id()
            );
        }
    }
    if let Some(mode) = args.layout {
        session.set_layout_mode(mode);
    }
    if let Some(mode) = args.labels {
        session.set_label_mode(mode);
    }
    if args.auto_layout {
        session.auto_layout();
    }
    for id in &args.hide {
        if session.topology().node(id).is_none() {
            warn!(node = %id, "cannot hide unknown node");
        }
        session.set_node_visible(id, false);
    }
    if let Some(zoom) = args.zoom {
        session.set_scale(zoom);
    }

    if args.stats {
        eprint!("{}", format_stats(&session));
    }

    let scene = session.scene();
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &scene)?;
    }

    let config = session.config();
    let svg = render_svg(&scene, &config.theme, &config.links);
    let default_name = session.export_file_name();
    match args.output_format {
        OutputFormat::Svg => {
            let output = args
                .output
                .as_deref()
                .map(|path| resolve_output(Some(path), &default_name, OutputFormat::Svg));
            write_output_svg(&svg, output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = resolve_output(args.output.as_deref(), &default_name, OutputFormat::Png);
            write_png(&svg, &output, config)?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

/// Directories get the export file name appended; a missing path becomes
/// the export file name in the working directory.
fn resolve_output(output: Option<&Path>, default_name: &str, format: OutputFormat) -> PathBuf {
    let file_name = Path::new(default_name).with_extension(format.extension());
    match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => file_name,
    }
}

fn parse_layout_mode(token: &str) -> Result<LayoutMode, String> {
    LayoutMode::from_token(token).ok_or_else(|| format!("unknown layout mode '{token}'"))
}

fn parse_label_mode(token: &str) -> Result<LabelMode, String> {
    LabelMode::from_token(token).ok_or_else(|| format!("unknown label mode '{token}'"))
}

fn format_customer_tree(store: &TopologyStore) -> String {
    let mut out = String::new();
    for entry in store.customer_tree() {
        out.push_str(&format!("{} ({})\n", entry.customer.name, entry.customer.id));
        for topo in entry.topologies {
            out.push_str(&format!(
                "  {:<12} {:<28} {} nodes, {} links\n",
                topo.id, topo.name, topo.node_count, topo.link_count
            ));
        }
    }
    out
}

fn format_stats<S: TopologySource>(session: &Session<S>) -> String {
    let stats = session.stats();
    format!(
        "nodes: {} (online {}, offline {}, warning {})\ncoverage: {}%\navg latency: {}ms\nlinks: {}\navg frequency: {}\n",
        stats.total,
        stats.online,
        stats.offline,
        stats.warning,
        stats.coverage,
        stats.avg_latency,
        stats.link_count,
        format_frequency(stats.avg_frequency)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_flags() {
        let args = Args::try_parse_from([
            "meshtopo",
            "render",
            "-t",
            "topo-c1-2",
            "--layout",
            "hierarchical",
            "--labels",
            "rssi",
            "--hide",
            "c1-t2-n4",
            "--hide",
            "c1-t2-n5",
            "-z",
            "1.5",
        ])
        .unwrap();
        let Command::Render(render) = args.command else {
            panic!("expected render");
        };
        assert_eq!(render.topology.as_deref(), Some("topo-c1-2"));
        assert_eq!(render.layout, Some(LayoutMode::Hierarchy));
        assert_eq!(render.labels, Some(LabelMode::Rssi));
        assert_eq!(render.hide.len(), 2);
        assert_eq!(render.zoom, Some(1.5));
    }

    #[test]
    fn rejects_unknown_label_mode() {
        assert!(Args::try_parse_from(["meshtopo", "render", "--labels", "jitter"]).is_err());
    }

    #[test]
    fn store_flag_is_global() {
        let args = Args::try_parse_from(["meshtopo", "list", "--store", "mesh.json"]).unwrap();
        assert_eq!(args.store.as_deref(), Some(Path::new("mesh.json")));
    }

    #[test]
    fn customer_tree_lists_every_topology() {
        let text = format_customer_tree(&TopologyStore::sample());
        assert!(text.starts_with("Huawei Technologies (c1)\n"));
        assert_eq!(text.lines().filter(|line| line.starts_with("  ")).count(), 5);
    }

    #[test]
    fn output_defaults_to_export_name() {
        let name = "Huawei-Technologies-Headquarters.svg";
        assert_eq!(
            resolve_output(None, name, OutputFormat::Png),
            PathBuf::from("Huawei-Technologies-Headquarters.png")
        );
        assert_eq!(
            resolve_output(Some(Path::new("out.svg")), name, OutputFormat::Svg),
            PathBuf::from("out.svg")
        );
    }

    #[test]
    fn stats_block_mentions_frequency() {
        let session = Session::new(TopologyStore::sample(), Config::default()).unwrap();
        assert!(format_stats(&session).contains("GHz"));
    }
}
