//! Finding out where the user is

pub mod resolver;
#[cfg(feature = "wasm")]
pub mod web;

pub use resolver::{GeolocationResolver, Geolocator, LocateOptions, LocationFix, ManualPosition};

use std::fmt;

/// Why a device locator could not produce a position. The numeric codes
/// follow the W3C geolocation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    /// No locator on this platform
    Unsupported,
}

impl PositionErrorCode {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Unsupported,
        }
    }
}

impl fmt::Display for PositionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::PermissionDenied => "permission denied",
            Self::PositionUnavailable => "position unavailable",
            Self::Timeout => "timeout",
            Self::Unsupported => "unsupported",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({code})")]
pub struct GeolocationError {
    pub code: PositionErrorCode,
    pub message: String,
}

impl GeolocationError {
    pub fn new(code: PositionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(PositionErrorCode::PermissionDenied, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PositionErrorCode::Timeout, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(PositionErrorCode::Unsupported, message)
    }
}
