//! Delivery records and the coordinate formats they arrive in

pub mod conversion;
pub mod delivery;

pub use conversion::{parse_lat_lng_text, WireLatLng};
pub use delivery::{Delivery, DeliveryId, Endpoint, PointOfInterest};
