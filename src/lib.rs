//! # Tavili
//!
//! A map client core for discovering nearby delivery tasks.
//!
//! The pipeline resolves the user's position, queries a backend for the
//! deliveries within a radius, projects each delivery into origin and
//! destination markers, groups those markers into two cluster layers and
//! draws a delivery's route when one of its markers is clicked. Drawing
//! pixels is left to the hosting map surface: this crate produces the scene.

pub mod core;
pub mod data;
pub mod layers;
pub mod location;
pub mod prelude;
pub mod query;
pub mod runtime;
pub mod spatial;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::Bounds,
    config::{ClientConfig, ClientProfile},
    geo::{LatLng, LatLngBounds, Point},
    map::{MapSession, PipelineState, QueryTicket, RenderSummary},
    viewport::Viewport,
};

pub use data::delivery::{Delivery, DeliveryId, Endpoint, PointOfInterest};

pub use layers::{
    base::LayerTrait,
    cluster::ClusterLayer,
    marker::{ClickAction, MarkerAnnotation, MarkerProjector},
    route::RouteHighlighter,
    vector::{Circle, Polyline},
};

pub use location::{
    resolver::{GeolocationResolver, Geolocator, LocateOptions, LocationFix, ManualPosition},
    GeolocationError,
};

pub use query::{
    client::{DeliveryQueryClient, QueryOutcome},
    transport::{DeliveryRequest, DeliveryTransport, HttpTransport},
};

pub use ui::log_panel::{LogPanel, LogSink};

/// Installs `env_logger` as the `log` backend, honouring `RUST_LOG`.
/// Calling it more than once is harmless.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Malformed delivery {id}: {reason}")]
    MalformedDelivery { id: String, reason: String },

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
