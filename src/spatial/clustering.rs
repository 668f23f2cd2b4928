use crate::{
    core::geo::Point,
    spatial::index::{SpatialIndex, SpatialItem},
};

/// Represents a cluster of markers
#[derive(Debug, Clone)]
pub struct Cluster<T> {
    /// Unique identifier for the cluster
    pub id: String,
    /// Center of the members' pixel bounds
    pub center: Point,
    /// Items in this cluster
    pub items: Vec<SpatialItem<T>>,
}

impl<T> Cluster<T> {
    pub fn new(id: String, items: Vec<SpatialItem<T>>) -> Self {
        let center = match items.split_first() {
            Some((first, rest)) => {
                let mut bounds = first.bounds.clone();
                for item in rest {
                    bounds.extend_bounds(&item.bounds);
                }
                bounds.center()
            }
            None => Point::default(),
        };

        Self { id, center, items }
    }

    /// Get the number of items in the cluster
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Check if this is a single-item cluster
    pub fn is_single(&self) -> bool {
        self.items.len() == 1
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }
}

/// Configuration for clustering
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringConfig {
    /// Items closer than this to a cluster's seed item join it (in pixels)
    pub max_cluster_radius: f64,
    /// Zoom level from which every item is its own cluster
    pub disable_clustering_at_zoom: Option<f64>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_cluster_radius: crate::core::constants::MAX_CLUSTER_RADIUS_PX,
            disable_clustering_at_zoom: None,
        }
    }
}

/// Greedy distance clustering over pixel-projected items.
///
/// Items are visited in the order given. An unvisited item seeds a new
/// cluster and pulls in every other unvisited item within
/// `max_cluster_radius` of it, so the result is deterministic for a given
/// input order and every item ends up in exactly one cluster.
#[derive(Debug, Clone, Default)]
pub struct Clustering {
    config: ClusteringConfig,
}

impl Clustering {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    pub fn cluster<T>(&self, items: Vec<SpatialItem<T>>, zoom_level: f64) -> Vec<Cluster<T>> {
        let disabled = self
            .config
            .disable_clustering_at_zoom
            .map_or(false, |zoom| zoom_level >= zoom);

        if disabled || self.config.max_cluster_radius <= 0.0 {
            return items
                .into_iter()
                .map(|item| Cluster::new(format!("cluster_{}", item.id), vec![item]))
                .collect();
        }

        // Index positions only; the items themselves move into clusters.
        let index = SpatialIndex::bulk_load(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| SpatialItem::new(item.id.clone(), item.bounds.clone(), i))
                .collect(),
        );

        let mut pending: Vec<Option<SpatialItem<T>>> = items.into_iter().map(Some).collect();
        let mut clusters = Vec::new();

        for seed in 0..pending.len() {
            let Some(seed_item) = pending[seed].take() else {
                continue;
            };

            let mut members: Vec<usize> = index
                .query_radius(&seed_item.center(), self.config.max_cluster_radius)
                .into_iter()
                .map(|neighbor| neighbor.data)
                .filter(|&i| pending[i].is_some())
                .collect();
            members.sort_unstable();

            let id = format!("cluster_{}", seed_item.id);
            let mut cluster_items = Vec::with_capacity(members.len() + 1);
            cluster_items.push(seed_item);
            cluster_items.extend(members.into_iter().filter_map(|i| pending[i].take()));

            clusters.push(Cluster::new(id, cluster_items));
        }

        clusters
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, x: f64, y: f64) -> SpatialItem<&'static str> {
        SpatialItem::from_point(id.to_string(), Point::new(x, y), "payload")
    }

    #[test]
    fn test_nearby_items_collapse() {
        let clustering = Clustering::default();
        let clusters = clustering.cluster(
            vec![
                item("a", 0.0, 0.0),
                item("b", 20.0, 20.0),
                item("c", 400.0, 400.0),
            ],
            13.0,
        );

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].id, "cluster_a");
        assert_eq!(clusters[0].count(), 2);
        assert!(clusters[0].contains("b"));
        assert!(clusters[1].is_single());
        assert_eq!(clusters[1].center, Point::new(400.0, 400.0));
    }

    #[test]
    fn test_every_item_lands_in_one_cluster() {
        let clustering = Clustering::default();
        let items: Vec<_> = (0..30)
            .map(|i| item(&format!("m{i}"), (i * 17 % 200) as f64, (i * 31 % 150) as f64))
            .collect();
        let clusters = clustering.cluster(items, 10.0);

        let total: usize = clusters.iter().map(Cluster::count).sum();
        assert_eq!(total, 30);
        for i in 0..30 {
            let id = format!("m{i}");
            assert_eq!(clusters.iter().filter(|c| c.contains(&id)).count(), 1);
        }
    }

    #[test]
    fn test_clustering_disabled_at_zoom() {
        let clustering = Clustering::new(ClusteringConfig {
            max_cluster_radius: 50.0,
            disable_clustering_at_zoom: Some(16.0),
        });
        let clusters = clustering.cluster(vec![item("a", 0.0, 0.0), item("b", 1.0, 1.0)], 17.0);
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(Cluster::is_single));
    }
}
