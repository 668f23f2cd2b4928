use crate::{
    core::geo::{LatLng, LatLngBounds},
    data::delivery::DeliveryId,
    layers::base::{LayerProperties, LayerTrait, LayerType},
};
use serde::{Deserialize, Serialize};

/// RGBA color that serializes as plain channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const RED: Self = Self::rgb(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#rrggbb`, alpha is carried separately as an opacity
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Short `#rgb` form when every channel repeats its nibble
    pub fn to_css(&self) -> String {
        let short = [self.r, self.g, self.b].iter().all(|c| c >> 4 == c & 0x0f);
        if short {
            format!("#{:x}{:x}{:x}", self.r & 0x0f, self.g & 0x0f, self.b & 0x0f)
        } else {
            self.to_hex()
        }
    }
}

/// Style for line features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Line color
    pub color: SerializableColor,
    /// Stroke weight in pixels
    pub weight: f64,
    /// Opacity (0.0 to 1.0)
    pub opacity: f64,
    /// Line dash pattern (empty for solid line)
    pub dash_pattern: Vec<f64>,
}

impl LineStyle {
    /// Dashed red line used for delivery routes
    pub fn route() -> Self {
        Self {
            color: SerializableColor::RED,
            weight: 2.0,
            opacity: 1.0,
            dash_pattern: vec![5.0, 6.0, 2.0, 6.0],
        }
    }

    /// Dash pattern in SVG `stroke-dasharray` notation, `None` for solid lines
    pub fn dash_array(&self) -> Option<String> {
        if self.dash_pattern.is_empty() {
            return None;
        }
        Some(
            self.dash_pattern
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::rgb(0, 0, 255),
            weight: 2.0,
            opacity: 1.0,
            dash_pattern: Vec::new(),
        }
    }
}

/// Style for circles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleStyle {
    pub color: SerializableColor,
    /// Stroke weight in pixels
    pub weight: f64,
    pub fill_color: SerializableColor,
    /// Fill opacity (0.0 to 1.0)
    pub fill_opacity: f64,
}

impl CircleStyle {
    /// Faint red disc marking the query radius
    pub fn query_radius() -> Self {
        Self {
            color: SerializableColor::RED,
            weight: 0.5,
            fill_color: SerializableColor::RED,
            fill_opacity: 0.1,
        }
    }
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self::query_radius()
    }
}

/// A polyline layer, optionally tied to the delivery whose route it draws
pub struct Polyline {
    properties: LayerProperties,
    points: Vec<LatLng>,
    style: LineStyle,
    delivery_id: Option<DeliveryId>,
}

impl Polyline {
    pub fn new(id: impl Into<String>, points: Vec<LatLng>, style: LineStyle) -> Self {
        Self {
            properties: LayerProperties::new(id, "Polyline", LayerType::Polyline),
            points,
            style,
            delivery_id: None,
        }
    }

    pub fn for_delivery(mut self, delivery_id: DeliveryId) -> Self {
        self.delivery_id = Some(delivery_id);
        self
    }

    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    pub fn style(&self) -> &LineStyle {
        &self.style
    }

    pub fn delivery_id(&self) -> Option<&DeliveryId> {
        self.delivery_id.as_ref()
    }
}

impl LayerTrait for Polyline {
    crate::impl_layer_trait!(properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(&self.points)
    }

    fn options(&self) -> serde_json::Value {
        let mut options = self.properties.describe();
        options["points"] = serde_json::json!(self
            .points
            .iter()
            .map(|p| [p.lat, p.lng])
            .collect::<Vec<_>>());
        options["color"] = serde_json::json!(self.style.color.to_css());
        options["weight"] = serde_json::json!(self.style.weight);
        options["line_opacity"] = serde_json::json!(self.style.opacity);
        options["dash_array"] = serde_json::json!(self.style.dash_array());
        options["delivery_id"] = serde_json::json!(self.delivery_id);
        options
    }
}

/// A circle with a radius on the ground, in meters
pub struct Circle {
    properties: LayerProperties,
    center: LatLng,
    radius_meters: f64,
    style: CircleStyle,
}

impl Circle {
    pub fn new(id: impl Into<String>, center: LatLng, radius_meters: f64, style: CircleStyle) -> Self {
        Self {
            properties: LayerProperties::new(id, "Circle", LayerType::Circle).non_interactive(),
            center,
            radius_meters,
            style,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn style(&self) -> &CircleStyle {
        &self.style
    }
}

impl LayerTrait for Circle {
    crate::impl_layer_trait!(properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        // Same degrees-to-meters approximation the radius was derived with.
        let span = self.radius_meters / crate::core::constants::METERS_PER_DEGREE;
        Some(LatLngBounds::new(
            LatLng::new(self.center.lat - span, self.center.lng - span),
            LatLng::new(self.center.lat + span, self.center.lng + span),
        ))
    }

    fn options(&self) -> serde_json::Value {
        let mut options = self.properties.describe();
        options["center"] = serde_json::json!([self.center.lat, self.center.lng]);
        options["radius"] = serde_json::json!(self.radius_meters);
        options["color"] = serde_json::json!(self.style.color.to_css());
        options["weight"] = serde_json::json!(self.style.weight);
        options["fill_color"] = serde_json::json!(self.style.fill_color.to_css());
        options["fill_opacity"] = serde_json::json!(self.style.fill_opacity);
        options
    }
}
