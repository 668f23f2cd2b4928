//! Shared trait abstractions for common patterns

use crate::core::geo::LatLngBounds;

/// Trait for layer-like objects held by the [`LayerManager`](crate::layers::manager::LayerManager)
pub trait LayerOperations: Send + Sync {
    /// Get layer ID
    fn id(&self) -> &str;

    /// Get layer z-index for ordering
    fn z_index(&self) -> i32;

    /// Set layer z-index
    fn set_z_index(&mut self, z_index: i32);

    /// Get layer bounds if applicable
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Everything a map surface needs to draw the layer
    fn options(&self) -> serde_json::Value;

    /// Downcast support for typed lookups
    fn as_any(&self) -> &dyn std::any::Any;
}
