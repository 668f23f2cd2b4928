use crate::core::{bounds::Bounds, geo::Point};

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A spatial item that can be indexed via an R-tree
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub id: String,
    pub bounds: Bounds,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(id: String, bounds: Bounds, data: T) -> Self {
        Self { id, bounds, data }
    }

    pub fn from_point(id: String, point: Point, data: T) -> Self {
        let bounds = Bounds::new(point, point);
        Self::new(id, bounds, data)
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }
}

impl<T> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for SpatialItem<T> {}

// --- rstar integration -------------------------------------------------------------------------

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.min.x, self.bounds.min.y],
            [self.bounds.max.x, self.bounds.max.y],
        )
    }
}

impl<T> PointDistance for SpatialItem<T> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let center = self.bounds.center();
        let dx = center.x - point[0];
        let dy = center.y - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree based spatial index over projected (pixel) coordinates
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
}

impl<T> SpatialIndex<T> {
    pub fn new() -> Self {
        Self {
            rtree: RTree::new(),
        }
    }

    /// Builds the tree in one pass, faster than repeated inserts
    pub fn bulk_load(items: Vec<SpatialItem<T>>) -> Self {
        Self {
            rtree: RTree::bulk_load(items),
        }
    }

    pub fn insert(&mut self, item: SpatialItem<T>) {
        self.rtree.insert(item);
    }

    pub fn query(&self, bounds: &Bounds) -> Vec<&SpatialItem<T>> {
        let envelope = AABB::from_corners(
            [bounds.min.x, bounds.min.y],
            [bounds.max.x, bounds.max.y],
        );
        self.rtree.locate_in_envelope_intersecting(&envelope).collect()
    }

    /// Items whose center lies within `radius` of `center` (inclusive)
    pub fn query_radius(&self, center: &Point, radius: f64) -> Vec<&SpatialItem<T>> {
        // rstar takes the squared radius
        self.rtree
            .locate_within_distance([center.x, center.y], radius * radius)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&SpatialItem<T>> {
        self.rtree.iter().find(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
    }
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_item(id: &str, x: f64, y: f64) -> SpatialItem<()> {
        SpatialItem::from_point(id.to_string(), Point::new(x, y), ())
    }

    #[test]
    fn test_query_radius_uses_real_distance() {
        let index = SpatialIndex::bulk_load(vec![
            point_item("a", 0.0, 0.0),
            point_item("b", 30.0, 40.0),
            point_item("c", 31.0, 40.0),
        ]);

        let mut hits: Vec<&str> = index
            .query_radius(&Point::new(0.0, 0.0), 50.0)
            .into_iter()
            .map(|item| item.id.as_str())
            .collect();
        hits.sort();
        assert_eq!(hits, vec!["a", "b"]);
    }

    #[test]
    fn test_query_bounds() {
        let mut index = SpatialIndex::new();
        index.insert(point_item("a", 5.0, 5.0));
        index.insert(point_item("b", 50.0, 50.0));

        let hits = index.query(&Bounds::from_coords(0.0, 0.0, 10.0, 10.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
        assert!(index.get("b").is_some());
        assert_eq!(index.len(), 2);

        index.clear();
        assert!(index.is_empty());
    }
}
