use crate::{
    core::{
        config::CommittedDisplay,
        geo::{LatLng, LatLngBounds, Point},
    },
    data::delivery::{Delivery, DeliveryId, Endpoint},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    location::resolver::LocationFix,
    ui::{
        icons::{IconKind, IconSet},
        popup::{ActionLink, PopupContent},
    },
};
use serde::Serialize;

/// Annotation id of the marker showing the user's own position
pub const SELF_MARKER_ID: &str = "self";

/// What happens when a marker is clicked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "delivery_id", rename_all = "snake_case")]
pub enum ClickAction {
    HighlightRoute(DeliveryId),
    None,
}

/// A positioned, clickable marker with its popup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerAnnotation {
    /// `<delivery id>:<endpoint>`, or [`SELF_MARKER_ID`]
    pub id: String,
    pub delivery_id: Option<DeliveryId>,
    pub endpoint: Option<Endpoint>,
    pub position: LatLng,
    pub icon: IconKind,
    /// Resolved image path of `icon`
    pub icon_url: String,
    pub anchor: Point,
    pub popup: PopupContent,
    pub click: ClickAction,
    /// Committed delivery shown in [`CommittedDisplay::Muted`] mode
    pub muted: bool,
}

impl MarkerAnnotation {
    pub fn annotation_id(delivery_id: &DeliveryId, endpoint: Endpoint) -> String {
        format!("{}:{}", delivery_id, endpoint)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "delivery_id": self.delivery_id,
            "endpoint": self.endpoint,
            "position": [self.position.lat, self.position.lng],
            "icon": self.icon_url,
            "anchor": [self.anchor.x, self.anchor.y],
            "popup": self.popup.to_html(),
            "click": self.click,
            "muted": self.muted,
        })
    }
}

/// Turns deliveries into marker annotations
#[derive(Debug, Clone, Default)]
pub struct MarkerProjector {
    committed: CommittedDisplay,
    icons: IconSet,
}

impl MarkerProjector {
    pub fn new(committed: CommittedDisplay, icons: IconSet) -> Self {
        Self { committed, icons }
    }

    pub fn committed(&self) -> CommittedDisplay {
        self.committed
    }

    /// Origin and destination annotations for a delivery, or none for a
    /// committed delivery under [`CommittedDisplay::Hidden`].
    pub fn project(&self, delivery: &Delivery) -> Vec<MarkerAnnotation> {
        let muted = !delivery.is_open();
        if muted && self.committed == CommittedDisplay::Hidden {
            log::debug!(
                "Skipping committed delivery {} (status {})",
                delivery.id,
                delivery.status
            );
            return Vec::new();
        }

        let link = if muted {
            ActionLink::Deliver(delivery.id.clone())
        } else {
            ActionLink::Take(delivery.id.clone())
        };

        Endpoint::ALL
            .iter()
            .map(|&endpoint| {
                let icon = match endpoint {
                    Endpoint::From => IconKind::Origin,
                    Endpoint::To => IconKind::Destination,
                };
                MarkerAnnotation {
                    id: MarkerAnnotation::annotation_id(&delivery.id, endpoint),
                    delivery_id: Some(delivery.id.clone()),
                    endpoint: Some(endpoint),
                    position: delivery.position(endpoint),
                    icon,
                    icon_url: self.icons.resolve(icon),
                    anchor: icon.anchor(),
                    popup: PopupContent::for_endpoint(delivery, endpoint, link.clone()),
                    click: ClickAction::HighlightRoute(delivery.id.clone()),
                    muted,
                }
            })
            .collect()
    }

    pub fn self_position(&self, fix: &LocationFix) -> MarkerAnnotation {
        let icon = IconKind::SelfPosition;
        MarkerAnnotation {
            id: SELF_MARKER_ID.to_string(),
            delivery_id: None,
            endpoint: None,
            position: fix.position,
            icon,
            icon_url: self.icons.resolve(icon),
            anchor: icon.anchor(),
            popup: PopupContent::for_self_position(fix.accuracy),
            click: ClickAction::None,
            muted: false,
        }
    }
}

/// Unclustered markers
pub struct MarkerLayer {
    properties: LayerProperties,
    markers: Vec<MarkerAnnotation>,
}

impl MarkerLayer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Marker),
            markers: Vec::new(),
        }
    }

    /// Adds a marker, replacing any marker with the same id
    pub fn add_marker(&mut self, marker: MarkerAnnotation) {
        self.markers.retain(|m| m.id != marker.id);
        self.markers.push(marker);
    }

    pub fn markers(&self) -> &[MarkerAnnotation] {
        &self.markers
    }

    pub fn marker(&self, id: &str) -> Option<&MarkerAnnotation> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }
}

impl LayerTrait for MarkerLayer {
    crate::impl_layer_trait!(properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        let points: Vec<LatLng> = self.markers.iter().map(|m| m.position).collect();
        LatLngBounds::from_points(&points)
    }

    fn options(&self) -> serde_json::Value {
        let mut options = self.properties.describe();
        options["markers"] = self.markers.iter().map(MarkerAnnotation::to_json).collect();
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery(status: i64) -> Delivery {
        Delivery::new("9", LatLng::new(32.07, 34.79), LatLng::new(32.09, 34.78))
            .with_addresses(Some("Herzl 1".to_string()), Some("Dizengoff 50".to_string()))
            .with_status(status)
    }

    #[test]
    fn test_open_delivery_projects_both_ends() {
        let projector = MarkerProjector::default();
        let annotations = projector.project(&delivery(0));

        assert_eq!(annotations.len(), 2);
        let origin = &annotations[0];
        assert_eq!(origin.id, "9:from");
        assert_eq!(origin.icon, IconKind::Origin);
        assert_eq!(origin.icon_url, "static/img/green_flag_icon.png");
        assert_eq!(origin.anchor, Point::new(1.0, 30.0));
        assert_eq!(origin.popup.text, "from here to Dizengoff 50");
        assert_eq!(origin.popup.link, Some(ActionLink::Take(DeliveryId::from("9"))));
        assert!(!origin.muted);

        let destination = &annotations[1];
        assert_eq!(destination.id, "9:to");
        assert_eq!(destination.icon, IconKind::Destination);
        assert_eq!(destination.popup.text, "from Herzl 1 to here");
        assert_eq!(
            destination.click,
            ClickAction::HighlightRoute(DeliveryId::from("9"))
        );
    }

    #[test]
    fn test_committed_delivery_hidden_by_default() {
        assert!(MarkerProjector::default().project(&delivery(1)).is_empty());
    }

    #[test]
    fn test_committed_delivery_muted() {
        let projector = MarkerProjector::new(CommittedDisplay::Muted, IconSet::default());
        let annotations = projector.project(&delivery(2));
        assert_eq!(annotations.len(), 2);
        assert!(annotations.iter().all(|a| a.muted));
        assert_eq!(
            annotations[0].popup.link,
            Some(ActionLink::Deliver(DeliveryId::from("9")))
        );
    }

    #[test]
    fn test_self_position_marker() {
        let projector = MarkerProjector::default();
        let marker = projector.self_position(&LocationFix {
            position: LatLng::new(32.0695, 34.7987),
            accuracy: 40.0,
        });
        assert_eq!(marker.id, SELF_MARKER_ID);
        assert_eq!(marker.icon_url, "static/img/cyan_pin_icon.png");
        assert_eq!(marker.anchor, Point::new(9.0, 30.0));
        assert_eq!(marker.popup.text, "you are 20 meters from here");
        assert_eq!(marker.click, ClickAction::None);
    }

    #[test]
    fn test_marker_layer_replaces_same_id() {
        let projector = MarkerProjector::default();
        let fix = LocationFix {
            position: LatLng::new(32.0, 34.0),
            accuracy: 0.0,
        };
        let mut layer = MarkerLayer::new("self", "You");
        layer.add_marker(projector.self_position(&fix));
        layer.add_marker(projector.self_position(&LocationFix {
            position: LatLng::new(32.5, 34.5),
            ..fix
        }));

        assert_eq!(layer.markers().len(), 1);
        assert_eq!(layer.marker("self").unwrap().position, LatLng::new(32.5, 34.5));
        assert_eq!(layer.options()["markers"][0]["click"]["action"], "none");
    }
}
