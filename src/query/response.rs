//! Decoding of delivery query responses
//!
//! A response is a JSON object mapping delivery ids to delivery records. The
//! backend may add a textual `error` next to the data, and other non-object
//! values (such as a numeric `status`); those are metadata, not deliveries.
//! The body may arrive wrapped as JSONP, `callback({...});`.

use crate::{data::delivery::Delivery, Error, Result};
use serde::Serialize;

/// A response entry that looked like a delivery but failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedDelivery {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    /// Sorted by id
    pub deliveries: Vec<Delivery>,
    pub rejected: Vec<RejectedDelivery>,
    /// The backend's `error` text, if any
    pub application_error: Option<String>,
}

/// Removes a JSONP `callback(...)` wrapper, leaving plain JSON untouched
pub fn strip_jsonp(body: &str) -> &str {
    let trimmed = body.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }

    let Some(open) = trimmed.find('(') else {
        return trimmed;
    };
    let callback = trimmed[..open].trim_end();
    let is_callback = !callback.is_empty()
        && callback
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'));
    if !is_callback {
        return trimmed;
    }

    let rest = trimmed[open + 1..].trim_end();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
    rest.strip_suffix(')').unwrap_or(rest)
}

pub fn parse_response(body: &str) -> Result<ParsedResponse> {
    let value: serde_json::Value = serde_json::from_str(strip_jsonp(body))?;
    let entries = match value {
        serde_json::Value::Object(entries) => entries,
        // An empty answer
        serde_json::Value::Null => return Ok(ParsedResponse::default()),
        other => {
            return Err(Error::Transport(format!(
                "expected a JSON object of deliveries, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut parsed = ParsedResponse::default();
    for (key, entry) in &entries {
        if key == "error" {
            match entry {
                serde_json::Value::String(text) => parsed.application_error = Some(text.clone()),
                serde_json::Value::Null => {}
                other => parsed.application_error = Some(other.to_string()),
            }
            continue;
        }
        if !entry.is_object() {
            log::debug!("Ignoring response metadata {key}={entry}");
            continue;
        }

        match Delivery::from_wire(key, entry) {
            Ok(delivery) => parsed.deliveries.push(delivery),
            Err(Error::MalformedDelivery { id, reason }) => {
                parsed.rejected.push(RejectedDelivery { id, reason })
            }
            Err(e) => parsed.rejected.push(RejectedDelivery {
                id: key.clone(),
                reason: e.to_string(),
            }),
        }
    }

    parsed.deliveries.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(parsed)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_jsonp() {
        assert_eq!(strip_jsonp(r#" {"a": 1} "#), r#"{"a": 1}"#);
        assert_eq!(strip_jsonp(r#"cb({"a": 1});"#), r#"{"a": 1}"#);
        assert_eq!(strip_jsonp("jQuery.cb_1 ( {} ) ;"), " {} ");
        assert_eq!(strip_jsonp("not json"), "not json");
    }

    #[test]
    fn test_parse_sorts_and_rejects() {
        let body = r#"{
            "10": {"fromLatLng": [32.0, 34.0], "toLatLng": [32.1, 34.1]},
            "9": {"fromlatlng": {"lat": 32.2, "lng": 34.2}, "tolatlng": ["32.3", "34.3"], "status": 1},
            "bad": {"fromLatLng": [32.0, 34.0]}
        }"#;
        let parsed = parse_response(body).unwrap();

        let ids: Vec<&str> = parsed.deliveries.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "10"]);
        assert_eq!(parsed.deliveries[0].status, 1);
        assert_eq!(parsed.rejected.len(), 1);
        assert_eq!(parsed.rejected[0].id, "bad");
        assert!(parsed.rejected[0].reason.contains("toLatLng"));
        assert_eq!(parsed.application_error, None);
    }

    #[test]
    fn test_error_text_keeps_data() {
        let body = r#"{"error": "radius clipped", "status": 403,
            "1": {"fromLatLng": [32.0, 34.0], "toLatLng": [32.1, 34.1]}}"#;
        let parsed = parse_response(body).unwrap();
        assert_eq!(parsed.application_error.as_deref(), Some("radius clipped"));
        assert_eq!(parsed.deliveries.len(), 1);
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn test_non_object_body_is_an_error() {
        assert!(parse_response("[1, 2]").is_err());
        assert!(parse_response("<html>").is_err());
    }

    #[test]
    fn test_null_body_is_empty() {
        let parsed = parse_response("cb(null);").unwrap();
        assert!(parsed.deliveries.is_empty());
        assert!(parsed.rejected.is_empty());
        assert_eq!(parsed.application_error, None);
    }
}
