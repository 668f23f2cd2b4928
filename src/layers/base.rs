// LayerTrait is unified with LayerOperations in shared traits
pub use crate::traits::LayerOperations as LayerTrait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Marker,
    Cluster,
    Circle,
    Polyline,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Marker => write!(f, "marker"),
            LayerType::Cluster => write!(f, "cluster"),
            LayerType::Circle => write!(f, "circle"),
            LayerType::Polyline => write!(f, "polyline"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub opacity: f64,
    pub visible: bool,
    pub interactive: bool,
}

impl LayerProperties {
    pub fn new(id: impl Into<String>, name: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layer_type,
            z_index: 0,
            opacity: 1.0,
            visible: true,
            interactive: true,
        }
    }

    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }

    /// Common fields every layer description starts from
    pub fn describe(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "layer_type": self.layer_type.to_string(),
            "z_index": self.z_index,
            "opacity": self.opacity,
            "visible": self.visible,
            "interactive": self.interactive,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_properties() {
        let props =
            LayerProperties::new("radius", "Query radius", LayerType::Circle).non_interactive();

        assert_eq!(props.id, "radius");
        assert_eq!(props.name, "Query radius");
        assert_eq!(props.layer_type, LayerType::Circle);
        assert_eq!(props.z_index, 0);
        assert_eq!(props.opacity, 1.0);
        assert!(props.visible);
        assert!(!props.interactive);
        assert_eq!(props.describe()["layer_type"], "circle");
    }

    #[test]
    fn test_layer_type_display() {
        assert_eq!(LayerType::Marker.to_string(), "marker");
        assert_eq!(LayerType::Cluster.to_string(), "cluster");
        assert_eq!(LayerType::Polyline.to_string(), "polyline");
    }
}
