use crate::{
    core::{
        config::{ClientConfig, ClientProfile},
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    data::delivery::{Delivery, DeliveryId, Endpoint, PointOfInterest},
    layers::{
        base::LayerTrait,
        cluster::{ClusterLayer, MarkerCluster},
        manager::LayerManager,
        marker::{ClickAction, MarkerAnnotation, MarkerLayer, MarkerProjector, SELF_MARKER_ID},
        route::RouteHighlighter,
        vector::{Circle, CircleStyle, Polyline},
    },
    location::resolver::{GeolocationResolver, LocationFix, ManualPosition},
    prelude::HashMap,
    query::{
        client::{DeliveryQueryClient, QueryOutcome},
        transport::DeliveryTransport,
    },
    spatial::clustering::ClusteringConfig,
    ui::log_panel::{LogPanel, LogSink},
    Error, Result,
};
use serde::Serialize;

/// Layer ids owned by the session
pub const FROM_LAYER_ID: &str = "deliveries_from";
pub const TO_LAYER_ID: &str = "deliveries_to";
pub const RADIUS_LAYER_ID: &str = "query_radius";
pub const SELF_LAYER_ID: &str = "self_position";

const RADIUS_Z_INDEX: i32 = 0;
const TO_Z_INDEX: i32 = 10;
const FROM_Z_INDEX: i32 = 20;
const SELF_Z_INDEX: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Querying,
}

/// Issued by [`MapSession::begin_query`]; only the most recent ticket may
/// complete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryTicket {
    generation: u64,
    center: LatLng,
    radius_degrees: f64,
    point_of_interest: Option<PointOfInterest>,
}

impl QueryTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn radius_degrees(&self) -> f64 {
        self.radius_degrees
    }

    pub fn point_of_interest(&self) -> Option<PointOfInterest> {
        self.point_of_interest
    }
}

/// What one render pass put on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSummary {
    pub generation: u64,
    /// Deliveries in the result set, including hidden committed ones
    pub deliveries: usize,
    pub from_annotations: usize,
    pub to_annotations: usize,
    pub rejected: usize,
    pub radius_meters: f64,
}

/// The map client: viewport, layers, routes and the log panel, driven
/// through query cycles.
pub struct MapSession {
    config: ClientConfig,
    viewport: Viewport,
    layers: LayerManager,
    projector: MarkerProjector,
    routes: RouteHighlighter,
    log: LogPanel,
    state: PipelineState,
    generation: u64,
    deliveries: HashMap<DeliveryId, Delivery>,
    last_fix: Option<LocationFix>,
}

impl MapSession {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let (width, height) = config.render.viewport_size;
        let viewport = Viewport::new(
            ManualPosition::default_position(),
            config.location.view_zoom,
            Point::new(width, height),
        );

        Ok(Self {
            viewport,
            layers: LayerManager::new(),
            projector: MarkerProjector::new(config.render.committed, config.icons.clone()),
            routes: RouteHighlighter::new(config.render.routes),
            log: LogPanel::new(config.log.max_lines),
            state: PipelineState::Idle,
            generation: 0,
            deliveries: HashMap::default(),
            last_fix: None,
            config,
        })
    }

    pub fn from_profile(profile: &ClientProfile) -> Result<Self> {
        Self::new(profile.resolve())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    pub fn routes(&self) -> &RouteHighlighter {
        &self.routes
    }

    /// Removes every route overlay, leaving the markers in place
    pub fn clear_routes(&mut self) {
        self.routes.clear();
    }

    pub fn log(&self) -> &LogPanel {
        &self.log
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn last_fix(&self) -> Option<LocationFix> {
        self.last_fix
    }

    /// Deliveries backing the current markers, sorted by id
    pub fn deliveries(&self) -> Vec<&Delivery> {
        let mut deliveries: Vec<&Delivery> = self.deliveries.values().collect();
        deliveries.sort_by(|a, b| a.id.cmp(&b.id));
        deliveries
    }

    pub fn delivery(&self, id: &DeliveryId) -> Option<&Delivery> {
        self.deliveries.get(id)
    }

    /// Moves the view onto a resolved position
    pub fn center_on(&mut self, fix: &LocationFix) {
        self.viewport
            .set_view(fix.position, self.config.location.view_zoom);
    }

    /// Places (or moves) the marker for the user's own position
    pub fn show_self_position(&mut self, fix: &LocationFix) -> Result<()> {
        let mut layer = MarkerLayer::new(SELF_LAYER_ID, "You are here");
        layer.set_z_index(SELF_Z_INDEX);
        let marker = self.projector.self_position(fix);
        self.log.log(&marker.popup.text);
        layer.add_marker(marker);

        self.layers.remove_layer(SELF_LAYER_ID);
        self.layers.add_layer(Box::new(layer))
    }

    /// Starts a query, superseding any query still in flight
    pub fn begin_query(
        &mut self,
        center: LatLng,
        radius_degrees: f64,
        point_of_interest: Option<PointOfInterest>,
    ) -> QueryTicket {
        self.generation += 1;
        self.state = PipelineState::Querying;
        log::debug!(
            "Query #{} around {} (radius {}°, {:?})",
            self.generation,
            center,
            radius_degrees,
            point_of_interest
        );
        QueryTicket {
            generation: self.generation,
            center,
            radius_degrees,
            point_of_interest,
        }
    }

    /// Completes a query. Returns `None` when nothing was rendered: the
    /// ticket was superseded, or the transport failed and the previous
    /// result stays on the map.
    pub fn complete_query(
        &mut self,
        ticket: QueryTicket,
        outcome: QueryOutcome,
    ) -> Result<Option<RenderSummary>> {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding query #{}, superseded by #{}",
                ticket.generation,
                self.generation
            );
            return Ok(None);
        }
        self.state = PipelineState::Idle;

        if outcome.transport_failed {
            return Ok(None);
        }

        let mut summary = self.render(&outcome.deliveries, ticket.center, ticket.radius_degrees)?;
        summary.rejected = outcome.rejected.len();
        Ok(Some(summary))
    }

    /// Replaces the previous result with `deliveries`: both cluster layers,
    /// the radius circle and any route overlays. Either everything is
    /// replaced or nothing is.
    pub fn render(
        &mut self,
        deliveries: &[Delivery],
        center: LatLng,
        radius_degrees: f64,
    ) -> Result<RenderSummary> {
        let clustering = ClusteringConfig {
            max_cluster_radius: self.config.render.cluster_radius_px,
            disable_clustering_at_zoom: None,
        };
        let mut from_layer = ClusterLayer::new(Endpoint::From, clustering.clone());
        from_layer.set_z_index(FROM_Z_INDEX);
        let mut to_layer = ClusterLayer::new(Endpoint::To, clustering);
        to_layer.set_z_index(TO_Z_INDEX);

        let mut rendered: HashMap<DeliveryId, Delivery> = HashMap::default();
        for delivery in deliveries {
            if rendered.contains_key(&delivery.id) {
                return Err(Error::Layer(format!("delivery {} listed twice", delivery.id)));
            }
            for annotation in self.projector.project(delivery) {
                match annotation.endpoint {
                    Some(Endpoint::From) => from_layer.add_annotation(annotation)?,
                    Some(Endpoint::To) => to_layer.add_annotation(annotation)?,
                    None => {}
                }
            }
            rendered.insert(delivery.id.clone(), delivery.clone());
        }

        let radius_meters = radius_degrees * self.config.render.meters_per_degree;
        let mut circle = Circle::new(
            RADIUS_LAYER_ID,
            center,
            radius_meters,
            CircleStyle::query_radius(),
        );
        circle.set_z_index(RADIUS_Z_INDEX);

        let summary = RenderSummary {
            generation: self.generation,
            deliveries: rendered.len(),
            from_annotations: from_layer.len(),
            to_annotations: to_layer.len(),
            rejected: 0,
            radius_meters,
        };

        self.layers
            .remove_layers([FROM_LAYER_ID, TO_LAYER_ID, RADIUS_LAYER_ID]);
        self.routes.clear();
        self.layers.add_layer(Box::new(circle))?;
        self.layers.add_layer(Box::new(to_layer))?;
        self.layers.add_layer(Box::new(from_layer))?;
        self.deliveries = rendered;

        log::info!(
            "Rendered {} deliveries ({} origins, {} destinations)",
            summary.deliveries,
            summary.from_annotations,
            summary.to_annotations
        );
        Ok(summary)
    }

    /// Queries around `center` and renders the result
    pub async fn query<T: DeliveryTransport>(
        &mut self,
        client: &DeliveryQueryClient<T>,
        center: LatLng,
        radius_degrees: f64,
        point_of_interest: Option<PointOfInterest>,
    ) -> Result<Option<RenderSummary>> {
        validate_radius(radius_degrees)?;
        let ticket = self.begin_query(center, radius_degrees, point_of_interest);
        let outcome = client
            .query_deliveries(&mut self.log, center, radius_degrees, point_of_interest)
            .await;
        self.complete_query(ticket, outcome)
    }

    /// resolve → center → self marker → query → render
    pub async fn run_query_cycle<T: DeliveryTransport>(
        &mut self,
        resolver: &GeolocationResolver,
        client: &DeliveryQueryClient<T>,
    ) -> Result<Option<RenderSummary>> {
        let fix = resolver.resolve_position(&mut self.log).await;
        self.last_fix = Some(fix);
        self.center_on(&fix);
        self.show_self_position(&fix)?;

        let radius = self.config.query.radius_degrees;
        let point_of_interest = self.config.query.point_of_interest;
        self.query(client, fix.position, radius, point_of_interest)
            .await
    }

    /// Queries again from the last resolved position (or the view center
    /// before any position was resolved)
    pub async fn requery<T: DeliveryTransport>(
        &mut self,
        client: &DeliveryQueryClient<T>,
        radius_degrees: f64,
        point_of_interest: Option<PointOfInterest>,
    ) -> Result<Option<RenderSummary>> {
        let center = self
            .last_fix
            .map(|fix| fix.position)
            .unwrap_or(self.viewport.center);
        self.query(client, center, radius_degrees, point_of_interest)
            .await
    }

    pub fn from_layer(&self) -> Option<&ClusterLayer> {
        self.layers.get_as::<ClusterLayer>(FROM_LAYER_ID)
    }

    pub fn to_layer(&self) -> Option<&ClusterLayer> {
        self.layers.get_as::<ClusterLayer>(TO_LAYER_ID)
    }

    pub fn cluster_layer(&self, role: Endpoint) -> Option<&ClusterLayer> {
        match role {
            Endpoint::From => self.from_layer(),
            Endpoint::To => self.to_layer(),
        }
    }

    pub fn circle(&self) -> Option<&Circle> {
        self.layers.get_as::<Circle>(RADIUS_LAYER_ID)
    }

    pub fn self_marker(&self) -> Option<&MarkerAnnotation> {
        self.layers
            .get_as::<MarkerLayer>(SELF_LAYER_ID)
            .and_then(|layer| layer.marker(SELF_MARKER_ID))
    }

    /// Every annotation on the map, origins first
    pub fn annotations(&self) -> Vec<&MarkerAnnotation> {
        Endpoint::ALL
            .iter()
            .filter_map(|&role| self.cluster_layer(role))
            .flat_map(|layer| layer.annotations())
            .collect()
    }

    pub fn annotation(&self, annotation_id: &str) -> Option<&MarkerAnnotation> {
        if annotation_id == SELF_MARKER_ID {
            return self.self_marker();
        }
        Endpoint::ALL
            .iter()
            .filter_map(|&role| self.cluster_layer(role))
            .find_map(|layer| layer.annotation(annotation_id))
    }

    /// Clusters of one layer at the current view
    pub fn clusters(&self, role: Endpoint) -> Vec<MarkerCluster> {
        self.cluster_layer(role)
            .map(|layer| layer.clusters(&self.viewport))
            .unwrap_or_default()
    }

    /// The annotations behind a cluster id returned by [`Self::clusters`]
    pub fn expand_cluster(&self, cluster_id: &str) -> Option<Vec<&MarkerAnnotation>> {
        Endpoint::ALL
            .iter()
            .filter_map(|&role| self.cluster_layer(role))
            .find_map(|layer| layer.expand(cluster_id, &self.viewport))
    }

    /// Runs a marker's click action. Returns the route overlay drawn, if any.
    pub fn click_marker(&mut self, annotation_id: &str) -> Result<Option<&Polyline>> {
        let click = self
            .annotation(annotation_id)
            .map(|annotation| annotation.click.clone())
            .ok_or_else(|| Error::Layer(format!("no marker {annotation_id}")))?;

        match click {
            ClickAction::HighlightRoute(delivery_id) => {
                let delivery = self.deliveries.get(&delivery_id).ok_or_else(|| {
                    Error::Layer(format!("marker {annotation_id} has no delivery {delivery_id}"))
                })?;
                Ok(self.routes.highlight_route(delivery))
            }
            ClickAction::None => Ok(None),
        }
    }

    /// Everything a map surface needs to draw the current state
    pub fn scene(&self) -> serde_json::Value {
        let layers: Vec<serde_json::Value> = self
            .layers
            .layers()
            .into_iter()
            .map(|layer| {
                let mut options = layer.options();
                if let (Some(bounds), Some(entry)) = (layer.bounds(), options.as_object_mut()) {
                    entry.insert(
                        "bounds".to_string(),
                        serde_json::json!([
                            [bounds.south_west.lat, bounds.south_west.lng],
                            [bounds.north_east.lat, bounds.north_east.lng],
                        ]),
                    );
                }
                options
            })
            .collect();
        let routes: Vec<serde_json::Value> = self.routes.overlays().map(|r| r.options()).collect();
        let clusters: serde_json::Map<String, serde_json::Value> = Endpoint::ALL
            .iter()
            .map(|&role| (role.to_string(), serde_json::json!(self.clusters(role))))
            .collect();

        serde_json::json!({
            "state": self.state,
            "view": {
                "center": [self.viewport.center.lat, self.viewport.center.lng],
                "zoom": self.viewport.zoom,
            },
            "layers": layers,
            "clusters": clusters,
            "routes": routes,
        })
    }

    /// Human readable overview of the map
    pub fn describe(&self) -> String {
        let mut lines = vec![format!(
            "view {} @ zoom {} ({:?})",
            self.viewport.center, self.viewport.zoom, self.state
        )];
        if let Some(circle) = self.circle() {
            lines.push(format!(
                "radius {} m around {}",
                circle.radius_meters(),
                circle.center()
            ));
        }
        if let Some(marker) = self.self_marker() {
            lines.push(format!("you: {} ({})", marker.position, marker.popup.text));
        }
        for role in Endpoint::ALL {
            for cluster in self.clusters(role) {
                if cluster.is_single() {
                    lines.push(format!("{role}: {}", cluster.annotation_ids.join(", ")));
                } else {
                    lines.push(format!(
                        "{role}: cluster of {} at {} [{}]",
                        cluster.count(),
                        cluster.position,
                        cluster.annotation_ids.join(", ")
                    ));
                }
            }
        }
        for route in self.routes.overlays() {
            lines.push(format!("route {} ({} points)", route.id(), route.points().len()));
        }
        lines.join("\n")
    }
}

fn validate_radius(radius_degrees: f64) -> Result<()> {
    if radius_degrees.is_finite() && radius_degrees > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "query radius must be positive, got {radius_degrees}"
        )))
    }
}
