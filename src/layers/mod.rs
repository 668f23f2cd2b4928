#[macro_use]
pub mod macros;

pub mod base;
pub mod cluster;
pub mod manager;
pub mod marker;
pub mod route;
pub mod vector;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use cluster::{ClusterLayer, MarkerCluster};
pub use manager::LayerManager;
pub use marker::{ClickAction, MarkerAnnotation, MarkerLayer, MarkerProjector, SELF_MARKER_ID};
pub use route::RouteHighlighter;
pub use vector::{Circle, CircleStyle, LineStyle, Polyline, SerializableColor};
