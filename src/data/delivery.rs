use crate::{
    core::geo::LatLng,
    data::conversion::{WireLatLng, WireNumber},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};

/// Opaque delivery identifier, unique within one query response
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(String);

impl DeliveryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Numeric ids sort numerically and before any other id.
    fn sort_key(&self) -> (bool, u64, &str) {
        match self.0.parse::<u64>() {
            Ok(number) => (false, number, &self.0),
            Err(_) => (true, 0, &self.0),
        }
    }
}

impl Ord for DeliveryId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for DeliveryId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeliveryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DeliveryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One end of a delivery. Also names the cluster layer an annotation belongs to
/// and the `pointofinterest` a radius query filters by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    From,
    To,
}

/// Which endpoint a radius query filters deliveries by
pub type PointOfInterest = Endpoint;

impl Endpoint {
    pub const ALL: [Endpoint; 2] = [Endpoint::From, Endpoint::To];

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::From => "from",
            Endpoint::To => "to",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "from" => Ok(Endpoint::From),
            "to" => Ok(Endpoint::To),
            other => Err(Error::Config(format!(
                "point of interest must be `from` or `to`, got {other:?}"
            ))),
        }
    }
}

/// A delivery as returned by one query. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delivery {
    pub id: DeliveryId,
    pub from_lat_lng: LatLng,
    pub to_lat_lng: LatLng,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub path: Vec<LatLng>,
    /// `0` is open, anything above has been committed to a courier
    pub status: i64,
}

impl Delivery {
    pub fn new(id: impl Into<DeliveryId>, from_lat_lng: LatLng, to_lat_lng: LatLng) -> Self {
        Self {
            id: id.into(),
            from_lat_lng,
            to_lat_lng,
            from_address: None,
            to_address: None,
            path: Vec::new(),
            status: 0,
        }
    }

    pub fn with_addresses(
        mut self,
        from_address: Option<String>,
        to_address: Option<String>,
    ) -> Self {
        self.from_address = from_address.filter(|a| !a.trim().is_empty());
        self.to_address = to_address.filter(|a| !a.trim().is_empty());
        self
    }

    pub fn with_path(mut self, path: Vec<LatLng>) -> Self {
        self.path = path;
        self
    }

    pub fn with_status(mut self, status: i64) -> Self {
        self.status = status;
        self
    }

    pub fn is_open(&self) -> bool {
        self.status <= 0
    }

    pub fn position(&self, endpoint: Endpoint) -> LatLng {
        match endpoint {
            Endpoint::From => self.from_lat_lng,
            Endpoint::To => self.to_lat_lng,
        }
    }

    pub fn address(&self, endpoint: Endpoint) -> Option<&str> {
        match endpoint {
            Endpoint::From => self.from_address.as_deref(),
            Endpoint::To => self.to_address.as_deref(),
        }
    }

    /// The endpoint's address, or its coordinates when no address is known
    pub fn display_text(&self, endpoint: Endpoint) -> String {
        self.address(endpoint)
            .map(str::to_string)
            .unwrap_or_else(|| self.position(endpoint).to_string())
    }

    /// Validates one entry of a query response
    pub fn from_wire(id: &str, value: &serde_json::Value) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedDelivery {
            id: id.to_string(),
            reason,
        };

        let record = DeliveryRecord::deserialize(value).map_err(|e| malformed(e.to_string()))?;

        let position = |wire: Option<&WireLatLng>, field: &str| -> Result<LatLng> {
            let wire = wire.ok_or_else(|| malformed(format!("missing {field}")))?;
            LatLng::try_from(wire).map_err(|e| malformed(format!("{field}: {e}")))
        };
        let from_lat_lng = position(record.from_lat_lng.as_ref(), "fromLatLng")?;
        let to_lat_lng = position(record.to_lat_lng.as_ref(), "toLatLng")?;

        let path = record
            .path
            .unwrap_or_default()
            .iter()
            .map(LatLng::try_from)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| malformed(format!("path: {e}")))?;

        let status = match record.status {
            None => 0,
            Some(status) => {
                let value = status.value().map_err(|e| malformed(format!("status: {e}")))?;
                if value.fract() != 0.0 || !value.is_finite() {
                    return Err(malformed(format!("status is not an integer: {value}")));
                }
                value as i64
            }
        };

        Ok(Delivery::new(id, from_lat_lng, to_lat_lng)
            .with_addresses(record.from_address, record.to_address)
            .with_path(path)
            .with_status(status))
    }
}

/// Raw record as the backend writes it, before validation
#[derive(Debug, Deserialize)]
struct DeliveryRecord {
    #[serde(rename = "fromLatLng", alias = "fromlatlng", alias = "from_lat_lng", default)]
    from_lat_lng: Option<WireLatLng>,
    #[serde(rename = "toLatLng", alias = "tolatlng", alias = "to_lat_lng", default)]
    to_lat_lng: Option<WireLatLng>,
    #[serde(rename = "fromAddress", alias = "fromaddress", alias = "from_address", default)]
    from_address: Option<String>,
    #[serde(rename = "toAddress", alias = "toaddress", alias = "to_address", default)]
    to_address: Option<String>,
    #[serde(default)]
    path: Option<Vec<WireLatLng>>,
    #[serde(default)]
    status: Option<WireNumber>,
}
