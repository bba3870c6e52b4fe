#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod drag;
pub mod input;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod projector;
pub mod render;
pub mod scene;
pub mod session;
pub mod stats;
pub mod store;
pub mod text_metrics;
pub mod theme;
pub mod viewport;
pub mod visibility;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use input::{EventResponse, InputEvent, InputHandler, PointerEvent};
pub use layout::compute_layout;
pub use model::{LabelMode, LayoutMode, MeshLink, MeshNode, NodeStatus, NodeType, Point, TopologyMap};
pub use render::{export_file_name, render_svg};
pub use scene::Scene;
pub use session::{Selection, Session, TopologyState};
pub use store::{StoreError, TopologySource, TopologyStore};
pub use theme::Theme;
