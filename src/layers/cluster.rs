use crate::{
    core::{
        geo::{LatLng, LatLngBounds},
        viewport::Viewport,
    },
    data::delivery::Endpoint,
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        marker::MarkerAnnotation,
    },
    spatial::{
        clustering::{Clustering, ClusteringConfig},
        index::SpatialItem,
    },
    Error, Result,
};
use serde::Serialize;

/// One visible group of annotations at a given zoom
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerCluster {
    pub id: String,
    pub position: LatLng,
    pub annotation_ids: Vec<String>,
}

impl MarkerCluster {
    pub fn count(&self) -> usize {
        self.annotation_ids.len()
    }

    /// A single annotation is drawn as the marker itself
    pub fn is_single(&self) -> bool {
        self.annotation_ids.len() == 1
    }
}

/// Clustered markers for one endpoint role. Annotations of the other role are
/// refused, so a cluster never mixes origins and destinations.
pub struct ClusterLayer {
    properties: LayerProperties,
    role: Endpoint,
    annotations: Vec<MarkerAnnotation>,
    clustering: Clustering,
}

impl ClusterLayer {
    pub fn new(role: Endpoint, config: ClusteringConfig) -> Self {
        Self {
            properties: LayerProperties::new(
                format!("deliveries_{}", role),
                role.as_str(),
                LayerType::Cluster,
            ),
            role,
            annotations: Vec::new(),
            clustering: Clustering::new(config),
        }
    }

    pub fn role(&self) -> Endpoint {
        self.role
    }

    pub fn add_annotation(&mut self, annotation: MarkerAnnotation) -> Result<()> {
        if annotation.endpoint != Some(self.role) {
            return Err(Error::Layer(format!(
                "annotation {} does not belong to the {} layer",
                annotation.id, self.role
            )));
        }
        if self.annotation(&annotation.id).is_some() {
            return Err(Error::Layer(format!(
                "annotation {} already in the {} layer",
                annotation.id, self.role
            )));
        }
        self.annotations.push(annotation);
        Ok(())
    }

    pub fn annotations(&self) -> &[MarkerAnnotation] {
        &self.annotations
    }

    pub fn annotation(&self, id: &str) -> Option<&MarkerAnnotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Groups annotations in world pixel space at the viewport's zoom
    pub fn clusters(&self, viewport: &Viewport) -> Vec<MarkerCluster> {
        let items: Vec<SpatialItem<usize>> = self
            .annotations
            .iter()
            .enumerate()
            .map(|(i, a)| SpatialItem::from_point(a.id.clone(), viewport.project(&a.position), i))
            .collect();

        self.clustering
            .cluster(items, viewport.zoom)
            .into_iter()
            .map(|cluster| {
                let position = if cluster.is_single() {
                    self.annotations[cluster.items[0].data].position
                } else {
                    LatLng::from_world_pixel(cluster.center, viewport.zoom)
                };
                MarkerCluster {
                    id: format!("{}/{}", self.role, cluster.id),
                    position,
                    annotation_ids: cluster.items.into_iter().map(|item| item.id).collect(),
                }
            })
            .collect()
    }

    /// The annotations behind a cluster, each with its own popup and click
    /// action. `None` if no such cluster exists at this viewport.
    pub fn expand(&self, cluster_id: &str, viewport: &Viewport) -> Option<Vec<&MarkerAnnotation>> {
        let cluster = self
            .clusters(viewport)
            .into_iter()
            .find(|c| c.id == cluster_id)?;
        Some(
            cluster
                .annotation_ids
                .iter()
                .filter_map(|id| self.annotation(id))
                .collect(),
        )
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
    }
}

impl LayerTrait for ClusterLayer {
    crate::impl_layer_trait!(properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        let points: Vec<LatLng> = self.annotations.iter().map(|a| a.position).collect();
        LatLngBounds::from_points(&points)
    }

    fn options(&self) -> serde_json::Value {
        let mut options = self.properties.describe();
        options["role"] = serde_json::json!(self.role);
        options["max_cluster_radius"] = serde_json::json!(self.clustering.config().max_cluster_radius);
        options["annotations"] = self
            .annotations
            .iter()
            .map(MarkerAnnotation::to_json)
            .collect();
        options
    }
}
