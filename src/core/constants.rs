//! Core constants taken from the delivery map client defaults.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels, used for Web Mercator pixel projection.
pub const TILE_SIZE: u32 = 256;

/// Endpoint queried for deliveries around a point.
pub const DELIVERIES_ENDPOINT: &str = "deliveriesinrange";

/// Page that lets a courier take a delivery.
pub const TAKE_DELIVERY_PAGE: &str = "delivery";

/// Page that lets a courier hand over a delivery.
pub const DELIVER_PAGE: &str = "deliver";

/// Device geolocation gives up after this long.
pub const GEOLOCATION_TIMEOUT_MS: u64 = 3000;

/// Zoom hint passed to the device locator.
pub const LOCATE_MAX_ZOOM: u8 = 14;

/// Zoom used when centering the view on a resolved position.
pub const DEFAULT_VIEW_ZOOM: f64 = 13.0;

/// Manual fallback position as `(lat, lng)`.
pub const DEFAULT_MANUAL_LAT_LNG: (f64, f64) = (32.0695, 34.7987);

/// Default query radius in degrees (courier page).
pub const DEFAULT_RADIUS_DEGREES: f64 = 0.02;

/// Query radius in degrees used by the recipient page.
pub const RECIPIENT_RADIUS_DEGREES: f64 = 0.2;

/// Degrees to meters. Only accurate near the equator.
pub const METERS_PER_DEGREE: f64 = 110_000.0;

/// Markers closer than this on screen collapse into one cluster.
pub const MAX_CLUSTER_RADIUS_PX: f64 = 50.0;

/// Anchor of the flag icons used for delivery endpoints.
pub const FLAG_ICON_ANCHOR: (f64, f64) = (1.0, 30.0);

/// Anchor of the pin icon used for the user's own position.
pub const PIN_ICON_ANCHOR: (f64, f64) = (9.0, 30.0);

/// Route overlays kept before the oldest is dropped.
pub const DEFAULT_MAX_ROUTE_OVERLAYS: usize = 8;

/// Lines kept by the log panel.
pub const DEFAULT_LOG_LINES: usize = 200;
