use crate::{
    core::{config::QueryConfig, constants::DELIVERIES_ENDPOINT, geo::LatLng},
    data::delivery::{Delivery, PointOfInterest},
    query::{
        response::{parse_response, RejectedDelivery},
        transport::{DeliveryRequest, DeliveryTransport},
    },
    ui::log_panel::LogSink,
};
use instant::Instant;

/// Result of one delivery query. Never an error: failures are logged and
/// leave `deliveries` empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    /// Sorted by id
    pub deliveries: Vec<Delivery>,
    /// Entries skipped as malformed
    pub rejected: Vec<RejectedDelivery>,
    /// Backend-reported `error` text; `deliveries` still holds any data sent
    /// alongside it
    pub application_error: Option<String>,
    /// Nothing usable came back
    pub transport_failed: bool,
}

impl QueryOutcome {
    pub fn failed() -> Self {
        Self {
            transport_failed: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }
}

/// Queries the backend for deliveries around a point
pub struct DeliveryQueryClient<T> {
    transport: T,
    endpoint: String,
}

impl<T: DeliveryTransport> DeliveryQueryClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            endpoint: DELIVERIES_ENDPOINT.to_string(),
        }
    }

    pub fn from_config(transport: T, config: &QueryConfig) -> Self {
        Self::new(transport).with_endpoint(config.endpoint.clone())
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches the deliveries within `radius_degrees` of `center`. Without a
    /// point of interest the backend filters by origin.
    pub async fn query_deliveries(
        &self,
        log: &mut dyn LogSink,
        center: LatLng,
        radius_degrees: f64,
        point_of_interest: Option<PointOfInterest>,
    ) -> QueryOutcome {
        let request = DeliveryRequest::new(self.endpoint.clone(), center, radius_degrees)
            .with_point_of_interest(point_of_interest);
        let started = Instant::now();

        let body = match self.transport.fetch(&request).await {
            Ok(body) => body,
            Err(e) => {
                log.log(&format!("Unable to retrieve {}: {}", self.endpoint, e));
                return QueryOutcome::failed();
            }
        };

        let parsed = match parse_response(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                log.log(&format!("Unable to retrieve {}: {}", self.endpoint, e));
                return QueryOutcome::failed();
            }
        };

        if let Some(error) = &parsed.application_error {
            log.log(error);
        }
        for rejected in &parsed.rejected {
            log::warn!("Skipping delivery {}: {}", rejected.id, rejected.reason);
            log.log(&format!("Skipping delivery {}: {}", rejected.id, rejected.reason));
        }
        log::debug!(
            "{} returned {} deliveries ({} rejected) in {:?}",
            self.endpoint,
            parsed.deliveries.len(),
            parsed.rejected.len(),
            started.elapsed()
        );

        QueryOutcome {
            deliveries: parsed.deliveries,
            rejected: parsed.rejected,
            application_error: parsed.application_error,
            transport_failed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::delivery::Endpoint, ui::log_panel::LogPanel, Error, Result};
    use async_trait::async_trait;
    use std::cell::RefCell;

    struct CannedTransport {
        body: Result<String>,
        seen: RefCell<Vec<DeliveryRequest>>,
    }

    impl CannedTransport {
        fn ok(body: &str) -> Self {
            Self {
                body: Ok(body.to_string()),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                body: Err(Error::Transport("connection refused".to_string())),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl DeliveryTransport for CannedTransport {
        async fn fetch(&self, request: &DeliveryRequest) -> Result<String> {
            self.seen.borrow_mut().push(request.clone());
            match &self.body {
                Ok(body) => Ok(body.clone()),
                Err(e) => Err(Error::Transport(e.to_string())),
            }
        }
    }

    const CENTER: LatLng = LatLng {
        lat: 32.0695,
        lng: 34.7987,
    };

    #[tokio::test]
    async fn test_query_passes_parameters() {
        let client = DeliveryQueryClient::new(CannedTransport::ok("{}"));
        let mut log = LogPanel::default();

        let outcome = client
            .query_deliveries(&mut log, CENTER, 0.2, Some(Endpoint::To))
            .await;
        assert!(outcome.is_empty());
        assert!(!outcome.transport_failed);

        let seen = client.transport().seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].endpoint, "deliveriesinrange");
        assert_eq!(seen[0].radius_degrees, 0.2);
        assert_eq!(seen[0].point_of_interest, Some(Endpoint::To));
    }

    #[tokio::test]
    async fn test_transport_failure_logs_endpoint() {
        let client = DeliveryQueryClient::new(CannedTransport::failing());
        let mut log = LogPanel::default();

        let outcome = client.query_deliveries(&mut log, CENTER, 0.02, None).await;
        assert!(outcome.transport_failed);
        assert!(outcome.is_empty());
        assert_eq!(log.len(), 1);
        assert!(log.contains("Unable to retrieve deliveriesinrange"));
    }

    #[tokio::test]
    async fn test_unparsable_body_is_a_failure() {
        let client = DeliveryQueryClient::new(CannedTransport::ok("<html>oops</html>"));
        let mut log = LogPanel::default();

        let outcome = client.query_deliveries(&mut log, CENTER, 0.02, None).await;
        assert!(outcome.transport_failed);
        assert!(log.contains("Unable to retrieve deliveriesinrange"));
    }

    #[tokio::test]
    async fn test_application_error_logged_data_kept() {
        let client = DeliveryQueryClient::new(CannedTransport::ok(
            r#"{"error": "partial results", "1": {"fromLatLng": [32.07, 34.79], "toLatLng": [32.08, 34.80]}}"#,
        ));
        let mut log = LogPanel::default();

        let outcome = client.query_deliveries(&mut log, CENTER, 0.02, None).await;
        assert_eq!(outcome.deliveries.len(), 1);
        assert_eq!(outcome.application_error.as_deref(), Some("partial results"));
        assert!(log.contains("partial results"));
    }

    #[tokio::test]
    async fn test_rejected_entries_reach_the_log() {
        let client = DeliveryQueryClient::new(CannedTransport::ok(
            r#"{"1": {"fromLatLng": [32.07, 34.79], "toLatLng": [32.08, 34.80]}, "3": {"toLatLng": [32.08, 34.80]}}"#,
        ));
        let mut log = LogPanel::default();

        let outcome = client.query_deliveries(&mut log, CENTER, 0.02, None).await;
        assert_eq!(outcome.deliveries.len(), 1);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(log.len(), 1);
        assert!(log.contains("Skipping delivery 3"));
    }
}
