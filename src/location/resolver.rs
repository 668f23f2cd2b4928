use crate::{
    core::{
        config::LocationConfig,
        constants::{DEFAULT_MANUAL_LAT_LNG, GEOLOCATION_TIMEOUT_MS, LOCATE_MAX_ZOOM},
        geo::LatLng,
    },
    data::conversion::parse_lat_lng_text,
    location::GeolocationError,
    prelude::Duration,
    runtime::with_timeout,
    ui::log_panel::LogSink,
};
use async_trait::async_trait;
use serde::Serialize;

/// A resolved position. `accuracy` is in meters, `0` for manual positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationFix {
    pub position: LatLng,
    pub accuracy: f64,
}

impl LocationFix {
    pub fn manual(position: LatLng) -> Self {
        Self {
            position,
            accuracy: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocateOptions {
    pub timeout: Duration,
    /// Zoom hint for locators that move the view themselves
    pub max_zoom: u8,
}

impl LocateOptions {
    pub fn from_config(config: &LocationConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            max_zoom: config.max_zoom,
        }
    }
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(GEOLOCATION_TIMEOUT_MS),
            max_zoom: LOCATE_MAX_ZOOM,
        }
    }
}

/// A device position source
#[async_trait(?Send)]
pub trait Geolocator {
    async fn locate(&self, options: &LocateOptions) -> Result<LocationFix, GeolocationError>;
}

/// Where to fall back to when the device can't tell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ManualPosition {
    #[default]
    Default,
    /// `lat:lng` (or `lat,lng`) as typed by the user
    Entered(String),
}

impl ManualPosition {
    pub fn default_position() -> LatLng {
        LatLng::new(DEFAULT_MANUAL_LAT_LNG.0, DEFAULT_MANUAL_LAT_LNG.1)
    }

    /// The manual position; an unparsable entry is logged and replaced by
    /// the default.
    pub fn resolve(&self, log: &mut dyn LogSink) -> LatLng {
        match self {
            Self::Default => Self::default_position(),
            Self::Entered(text) => match parse_lat_lng_text(text) {
                Ok(position) => position,
                Err(e) => {
                    log.log(&format!("Ignoring manual position {text:?}: {e}"));
                    Self::default_position()
                }
            },
        }
    }
}

/// Resolves the user's position from the device, falling back to a manual
/// one. Never fails.
pub struct GeolocationResolver {
    geolocator: Option<Box<dyn Geolocator>>,
    options: LocateOptions,
    manual: ManualPosition,
    force_manual: bool,
}

impl GeolocationResolver {
    pub fn new(geolocator: Box<dyn Geolocator>) -> Self {
        Self {
            geolocator: Some(geolocator),
            options: LocateOptions::default(),
            manual: ManualPosition::Default,
            force_manual: false,
        }
    }

    pub fn from_config(geolocator: Option<Box<dyn Geolocator>>, config: &LocationConfig) -> Self {
        let manual = match &config.manual_position {
            Some(text) => ManualPosition::Entered(text.clone()),
            None => ManualPosition::Default,
        };
        Self {
            geolocator,
            options: LocateOptions::from_config(config),
            manual,
            force_manual: config.force_manual,
        }
    }

    pub fn with_options(mut self, options: LocateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_manual(mut self, manual: ManualPosition) -> Self {
        self.manual = manual;
        self
    }

    pub fn options(&self) -> &LocateOptions {
        &self.options
    }

    pub async fn resolve_position(&self, log: &mut dyn LogSink) -> LocationFix {
        let geolocator = match &self.geolocator {
            Some(geolocator) if !self.force_manual => geolocator,
            _ => {
                log::debug!("Using manual position");
                return LocationFix::manual(self.manual.resolve(log));
            }
        };

        match with_timeout(self.options.timeout, geolocator.locate(&self.options)).await {
            Some(Ok(fix)) if fix.position.is_valid() => {
                log::debug!("Located at {} (±{} m)", fix.position, fix.accuracy);
                return fix;
            }
            Some(Ok(fix)) => log.log(&format!(
                "Geolocation: ignoring invalid position {}",
                fix.position
            )),
            Some(Err(e)) => log.log(&format!("Geolocation: {}", e.message)),
            None => log.log(&format!(
                "Geolocation: timed out after {} ms",
                self.options.timeout.as_millis()
            )),
        }

        LocationFix::manual(self.manual.resolve(log))
    }
}
