//! Configuration for the delivery map client
//!
//! Every section has serde defaults, so a JSON file only needs the values it
//! changes. The courier and recipient pages each get a complete
//! configuration through the [`ClientProfile`] presets.

use crate::{
    core::constants::{
        DEFAULT_LOG_LINES, DEFAULT_MAX_ROUTE_OVERLAYS, DEFAULT_RADIUS_DEGREES, DEFAULT_VIEW_ZOOM,
        DELIVERIES_ENDPOINT, GEOLOCATION_TIMEOUT_MS, LOCATE_MAX_ZOOM, MAX_CLUSTER_RADIUS_PX,
        METERS_PER_DEGREE, RECIPIENT_RADIUS_DEGREES,
    },
    data::delivery::Endpoint,
    ui::icons::IconSet,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientProfile {
    /// Deliveries leaving from near the user, small radius
    Courier,
    /// Deliveries arriving near the user, wide radius
    Recipient,
    Custom(ClientConfig),
}

impl ClientProfile {
    pub fn resolve(&self) -> ClientConfig {
        match self {
            Self::Courier => ClientConfig::default(),
            Self::Recipient => ClientConfig {
                query: QueryConfig {
                    radius_degrees: RECIPIENT_RADIUS_DEGREES,
                    point_of_interest: Some(Endpoint::To),
                    ..QueryConfig::default()
                },
                ..ClientConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }

    /// Profile by name, as accepted on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "courier" => Some(Self::Courier),
            "recipient" => Some(Self::Recipient),
            _ => None,
        }
    }
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self::Courier
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub query: QueryConfig,
    pub location: LocationConfig,
    pub render: RenderConfig,
    pub icons: IconSet,
    pub log: LogConfig,
}

impl ClientConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading client config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.query.radius_degrees.is_finite() || self.query.radius_degrees <= 0.0 {
            return Err(Error::Config(format!(
                "query radius must be positive, got {}",
                self.query.radius_degrees
            )));
        }
        if self.query.endpoint.trim().is_empty() {
            return Err(Error::Config("query endpoint is empty".to_string()));
        }
        if self.location.timeout_ms == 0 {
            return Err(Error::Config("geolocation timeout must be non-zero".to_string()));
        }
        if self.render.cluster_radius_px.is_nan() || self.render.cluster_radius_px < 0.0 {
            return Err(Error::Config("cluster radius cannot be negative".to_string()));
        }
        if !self.render.meters_per_degree.is_finite() || self.render.meters_per_degree <= 0.0 {
            return Err(Error::Config("meters per degree must be positive".to_string()));
        }
        if let RouteOverlayPolicy::Accumulate { max_overlays: 0 } = self.render.routes {
            return Err(Error::Config("route overlay cap must be at least 1".to_string()));
        }
        if self.log.max_lines == 0 {
            return Err(Error::Config("log panel needs room for one line".to_string()));
        }
        Ok(())
    }
}

/// Where and how deliveries are queried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub base_url: String,
    pub endpoint: String,
    pub radius_degrees: f64,
    /// `None` leaves the parameter out, which the backend reads as `from`
    pub point_of_interest: Option<Endpoint>,
    pub user_agent: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/".to_string(),
            endpoint: DELIVERIES_ENDPOINT.to_string(),
            radius_degrees: DEFAULT_RADIUS_DEGREES,
            point_of_interest: None,
            user_agent: concat!("tavili/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub timeout_ms: u64,
    pub max_zoom: u8,
    /// Zoom applied when the view is centered on the resolved position
    pub view_zoom: f64,
    /// Manual `lat:lng` entry; the built-in default is used when absent
    pub manual_position: Option<String>,
    /// Skip the device and go straight to the manual position
    pub force_manual: bool,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: GEOLOCATION_TIMEOUT_MS,
            max_zoom: LOCATE_MAX_ZOOM,
            view_zoom: DEFAULT_VIEW_ZOOM,
            manual_position: None,
            force_manual: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommittedDisplay {
    /// Deliveries with a non-zero status are not projected at all
    Hidden,
    /// Committed deliveries are shown muted, with a `deliver` link
    Muted,
}

impl Default for CommittedDisplay {
    fn default() -> Self {
        Self::Hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RouteOverlayPolicy {
    /// Keep drawing routes, dropping the oldest beyond `max_overlays`
    Accumulate { max_overlays: usize },
    /// Every highlight clears the routes drawn before it
    ReplacePrevious,
}

impl Default for RouteOverlayPolicy {
    fn default() -> Self {
        Self::Accumulate {
            max_overlays: DEFAULT_MAX_ROUTE_OVERLAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub cluster_radius_px: f64,
    pub meters_per_degree: f64,
    pub committed: CommittedDisplay,
    pub routes: RouteOverlayPolicy,
    /// Map surface size in pixels
    pub viewport_size: (f64, f64),
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cluster_radius_px: MAX_CLUSTER_RADIUS_PX,
            meters_per_degree: METERS_PER_DEGREE,
            committed: CommittedDisplay::default(),
            routes: RouteOverlayPolicy::default(),
            viewport_size: (1024.0, 768.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub max_lines: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_LOG_LINES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let courier = ClientProfile::Courier.resolve();
        assert_eq!(courier.query.radius_degrees, 0.02);
        assert_eq!(courier.query.point_of_interest, None);

        let recipient = ClientProfile::from_name("Recipient").unwrap().resolve();
        assert_eq!(recipient.query.radius_degrees, 0.2);
        assert_eq!(recipient.query.point_of_interest, Some(Endpoint::To));
        assert!(ClientProfile::from_name("pilot").is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ClientConfig::from_json_str(
            r#"{
                "query": { "base_url": "https://deliveries.example/", "point_of_interest": "to" },
                "render": { "routes": { "mode": "replace_previous" } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.query.base_url, "https://deliveries.example/");
        assert_eq!(config.query.endpoint, "deliveriesinrange");
        assert_eq!(config.query.point_of_interest, Some(Endpoint::To));
        assert_eq!(config.render.routes, RouteOverlayPolicy::ReplacePrevious);
        assert_eq!(config.location.timeout_ms, 3000);
        assert_eq!(config.location.manual_position, None);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ClientConfig::default();
        config.query.radius_degrees = 0.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = ClientConfig::default();
        config.render.routes = RouteOverlayPolicy::Accumulate { max_overlays: 0 };
        assert!(config.validate().is_err());

        let result = ClientConfig::from_json_str(r#"{ "location": { "timeout_ms": 0 } }"#);
        assert!(result.is_err());
    }
}
