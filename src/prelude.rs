//! Prelude module for common tavili types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use tavili::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{
        ClientConfig, ClientProfile, CommittedDisplay, LocationConfig, LogConfig, QueryConfig,
        RenderConfig, RouteOverlayPolicy,
    },
    geo::{LatLng, LatLngBounds, Point},
    map::{MapSession, PipelineState, QueryTicket, RenderSummary},
    viewport::Viewport,
};

pub use crate::data::delivery::{Delivery, DeliveryId, Endpoint, PointOfInterest};

pub use crate::layers::{
    base::{LayerProperties, LayerTrait, LayerType},
    cluster::{ClusterLayer, MarkerCluster},
    manager::LayerManager,
    marker::{ClickAction, MarkerAnnotation, MarkerLayer, MarkerProjector},
    route::RouteHighlighter,
    vector::{Circle, CircleStyle, LineStyle, Polyline, SerializableColor},
};

pub use crate::spatial::{
    clustering::{Cluster, Clustering, ClusteringConfig},
    index::{SpatialIndex, SpatialItem},
};

pub use crate::location::{
    resolver::{GeolocationResolver, Geolocator, LocateOptions, LocationFix, ManualPosition},
    GeolocationError, PositionErrorCode,
};

pub use crate::query::{
    client::{DeliveryQueryClient, QueryOutcome},
    response::RejectedDelivery,
    transport::{DeliveryRequest, DeliveryTransport, HttpTransport},
};

pub use crate::ui::{
    icons::{IconKind, IconSet},
    log_panel::{LogLine, LogPanel, LogSink},
    popup::{ActionLink, PopupContent},
};

pub use crate::{Error as MapError, Result};

pub use std::time::Duration;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::Future;
