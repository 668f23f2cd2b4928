//! Fetching the deliveries around a position

pub mod client;
pub mod response;
pub mod transport;

pub use client::{DeliveryQueryClient, QueryOutcome};
pub use response::{parse_response, strip_jsonp, ParsedResponse, RejectedDelivery};
pub use transport::{DeliveryRequest, DeliveryTransport, HttpTransport};
