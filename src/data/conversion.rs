//! Coordinate conversions between loosely typed JSON and [`LatLng`].
//!
//! The backend is not strict about how it writes coordinates: pairs can come
//! as arrays or objects, and numbers sometimes arrive as strings.

use crate::{core::geo::LatLng, Error, Result};
use serde::Deserialize;

/// A number on the wire, possibly quoted
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Number(f64),
    Text(String),
}

impl WireNumber {
    pub fn value(&self) -> Result<f64> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidCoordinates(format!("not a number: {text:?}"))),
        }
    }
}

/// A position on the wire: `[lat, lng]`, `{"lat", "lng"}` or `"lat:lng"`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireLatLng {
    Pair([WireNumber; 2]),
    Object { lat: WireNumber, lng: WireNumber },
    Text(String),
}

impl TryFrom<&WireLatLng> for LatLng {
    type Error = Error;

    fn try_from(wire: &WireLatLng) -> Result<Self> {
        let lat_lng = match wire {
            WireLatLng::Pair([lat, lng]) | WireLatLng::Object { lat, lng } => {
                LatLng::new(lat.value()?, lng.value()?)
            }
            WireLatLng::Text(text) => return parse_lat_lng_text(text),
        };
        validated(lat_lng)
    }
}

/// Parses a manually entered position such as `32.0695:34.7987` or `32.0695, 34.7987`
pub fn parse_lat_lng_text(text: &str) -> Result<LatLng> {
    let separator = if text.contains(':') { ':' } else { ',' };
    let mut parts = text.split(separator).map(str::trim);

    let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::InvalidCoordinates(format!(
            "expected `lat:lng`, got {text:?}"
        )));
    };

    let parse = |part: &str| {
        part.parse::<f64>()
            .map_err(|_| Error::InvalidCoordinates(format!("not a number: {part:?}")))
    };
    validated(LatLng::new(parse(lat)?, parse(lng)?))
}

fn validated(lat_lng: LatLng) -> Result<LatLng> {
    if lat_lng.is_valid() {
        Ok(lat_lng)
    } else {
        Err(Error::InvalidCoordinates(format!(
            "{lat_lng} is outside the valid range"
        )))
    }
}
