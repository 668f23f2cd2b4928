use crate::{
    core::{config::QueryConfig, geo::LatLng},
    data::delivery::PointOfInterest,
    Error, Result,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Url;

/// Shared async HTTP client for delivery queries. No request timeout: a
/// query waits for the backend.
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> =
    Lazy::new(|| build_client(concat!("tavili/", env!("CARGO_PKG_VERSION"))).unwrap_or_default());

fn build_client(user_agent: &str) -> Result<reqwest::Client> {
    let builder = reqwest::Client::builder();
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder.user_agent(user_agent.to_string());
    #[cfg(target_arch = "wasm32")]
    let _ = user_agent;
    Ok(builder.build()?)
}

/// One `deliveriesinrange`-style request
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryRequest {
    pub endpoint: String,
    pub center: LatLng,
    pub radius_degrees: f64,
    /// `None` leaves the choice to the backend, which filters by origin
    pub point_of_interest: Option<PointOfInterest>,
}

impl DeliveryRequest {
    pub fn new(endpoint: impl Into<String>, center: LatLng, radius_degrees: f64) -> Self {
        Self {
            endpoint: endpoint.into(),
            center,
            radius_degrees,
            point_of_interest: None,
        }
    }

    pub fn with_point_of_interest(mut self, point_of_interest: Option<PointOfInterest>) -> Self {
        self.point_of_interest = point_of_interest;
        self
    }

    /// Query string parameters, in the order they are sent
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lat", self.center.lat.to_string()),
            ("lng", self.center.lng.to_string()),
            ("radius", self.radius_degrees.to_string()),
        ];
        if let Some(poi) = self.point_of_interest {
            params.push(("pointofinterest", poi.as_str().to_string()));
        }
        params
    }
}

/// Carries a request to the backend and returns the raw response body
#[async_trait(?Send)]
pub trait DeliveryTransport {
    async fn fetch(&self, request: &DeliveryRequest) -> Result<String>;
}

/// [`DeliveryTransport`] over HTTP GET
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Transport on the shared client. Endpoints resolve relative to
    /// `base_url`, which is treated as a directory.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: HTTP_CLIENT.clone(),
            base_url: Self::parse_base(base_url)?,
        })
    }

    pub fn from_config(config: &QueryConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(&config.user_agent)?,
            base_url: Self::parse_base(&config.base_url)?,
        })
    }

    fn parse_base(base_url: &str) -> Result<Url> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base).map_err(|e| Error::Config(format!("invalid base url {base_url:?}: {e}")))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| Error::Config(format!("invalid endpoint {endpoint:?}: {e}")))
    }
}

#[async_trait(?Send)]
impl DeliveryTransport for HttpTransport {
    async fn fetch(&self, request: &DeliveryRequest) -> Result<String> {
        let url = self.endpoint_url(&request.endpoint)?;
        log::debug!("GET {} {:?}", url, request.params());

        let response = self
            .client
            .get(url.clone())
            .query(&request.params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::delivery::Endpoint;

    #[test]
    fn test_params() {
        let request = DeliveryRequest::new("deliveriesinrange", LatLng::new(32.0695, 34.7987), 0.02);
        assert_eq!(
            request.params(),
            vec![
                ("lat", "32.0695".to_string()),
                ("lng", "34.7987".to_string()),
                ("radius", "0.02".to_string()),
            ]
        );

        let request = request.with_point_of_interest(Some(Endpoint::To));
        assert_eq!(
            request.params().last(),
            Some(&("pointofinterest", "to".to_string()))
        );
    }

    #[test]
    fn test_endpoint_url_resolves_under_base() {
        let transport = HttpTransport::new("http://localhost:5000/app").unwrap();
        assert_eq!(
            transport.endpoint_url("deliveriesinrange").unwrap().as_str(),
            "http://localhost:5000/app/deliveriesinrange"
        );
        assert!(HttpTransport::new("not a url").is_err());
    }
}
