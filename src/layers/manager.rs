use crate::{layers::base::LayerTrait, Error, Result};

use crate::prelude::HashMap;

/// Holds the layers on the map surface, ordered by z-index
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Ordered list of layer IDs for drawing (sorted by z-index)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer to the manager. An existing layer with the same id is
    /// an error; remove it first.
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(Error::Layer(format!("layer {} already added", layer_id)));
        }
        let z_index = layer.z_index();

        self.layers.insert(layer_id.clone(), layer);

        // Insert in sorted order by z-index, after layers with the same z-index
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.render_order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    /// Removes every listed layer, returning how many were present
    pub fn remove_layers<'a>(&mut self, layer_ids: impl IntoIterator<Item = &'a str>) -> usize {
        layer_ids
            .into_iter()
            .filter_map(|id| self.remove_layer(id))
            .count()
    }

    /// Gets a layer by ID as its concrete type
    pub fn get_as<T: 'static>(&self, layer_id: &str) -> Option<&T> {
        self.layers
            .get(layer_id)
            .and_then(|l| l.as_any().downcast_ref::<T>())
    }

    /// Lists all layer IDs in render order
    pub fn list_layers(&self) -> Vec<String> {
        self.render_order.clone()
    }

    /// Gets all layers in render order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.render_order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| l.as_ref()))
            .collect()
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the manager is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::geo::LatLng,
        layers::vector::{Circle, CircleStyle, LineStyle, Polyline},
    };

    fn circle(id: &str, z_index: i32) -> Box<dyn LayerTrait> {
        let mut circle = Circle::new(id, LatLng::new(32.0, 34.0), 100.0, CircleStyle::default());
        circle.set_z_index(z_index);
        Box::new(circle)
    }

    #[test]
    fn test_render_order_follows_z_index() {
        let mut manager = LayerManager::new();
        manager.add_layer(circle("top", 10)).unwrap();
        manager.add_layer(circle("bottom", -1)).unwrap();
        manager.add_layer(circle("middle", 0)).unwrap();

        assert_eq!(manager.list_layers(), vec!["bottom", "middle", "top"]);

        manager.add_layer(circle("also_middle", 0)).unwrap();
        assert_eq!(
            manager.list_layers(),
            vec!["bottom", "middle", "also_middle", "top"]
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut manager = LayerManager::new();
        manager.add_layer(circle("radius", 0)).unwrap();
        assert!(manager.add_layer(circle("radius", 0)).is_err());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_typed_access_and_removal() {
        let mut manager = LayerManager::new();
        manager.add_layer(circle("radius", 0)).unwrap();
        manager
            .add_layer(Box::new(Polyline::new(
                "route",
                vec![LatLng::new(32.0, 34.0), LatLng::new(32.1, 34.1)],
                LineStyle::route(),
            )))
            .unwrap();

        assert_eq!(manager.get_as::<Circle>("radius").unwrap().radius_meters(), 100.0);
        assert!(manager.get_as::<Polyline>("radius").is_none());
        assert!(manager.get_as::<Polyline>("route").is_some());

        assert_eq!(manager.remove_layers(["radius", "route", "missing"]), 2);
        assert!(manager.is_empty());
    }
}
