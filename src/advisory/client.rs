//! Advisory service clients.
//!
//! One blocking POST per request, JSON in and out. No retries: a failed
//! call is reported once and the user decides whether to ask again.

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, warn};

use super::AdvisoryRequest;
use crate::config::AdvisoryConfig;
use crate::intake::{AdvisoryResponse, Endpoint, IntakeError};

/// Errors calling an advisory service.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Undecodable response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: IntakeError,
    },
}

impl AdvisoryError {
    /// Address of the failed call, when known.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Client(_) => None,
            Self::Transport { url, .. } | Self::Status { url, .. } | Self::Decode { url, .. } => {
                Some(url)
            }
        }
    }

    /// Text shown in the chat when a call to `endpoint` fails.
    pub fn user_message(&self, endpoint: Endpoint) -> String {
        match endpoint {
            Endpoint::Optimize => format!(
                "Connection Error: Could not reach the optimization engine at {}. \
                 Please check your network connection.",
                self.url().unwrap_or("the configured address")
            ),
            Endpoint::Simulate => "Could not run simulations. Please check connection.".to_string(),
        }
    }
}

/// The optimizer and scenario simulator.
pub trait AdvisoryService {
    /// Asks the optimizer for proposals, drill-downs or advice.
    fn optimize(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError>;

    /// Asks the simulator for scenarios.
    fn simulate(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError>;

    /// Dispatches to the service behind `endpoint`.
    fn call(
        &self,
        endpoint: Endpoint,
        request: &AdvisoryRequest,
    ) -> Result<AdvisoryResponse, AdvisoryError> {
        match endpoint {
            Endpoint::Optimize => self.optimize(request),
            Endpoint::Simulate => self.simulate(request),
        }
    }
}

/// HTTP client for both services.
#[derive(Debug, Clone)]
pub struct HttpAdvisoryClient {
    client: Client,
    optimize_url: String,
    simulate_url: String,
}

impl HttpAdvisoryClient {
    /// Builds a client from the `[advisory]` configuration section.
    pub fn from_config(config: &AdvisoryConfig) -> Result<Self, AdvisoryError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(AdvisoryError::Client)?;
        Ok(Self {
            client,
            optimize_url: config.optimize_url.clone(),
            simulate_url: config.simulate_url.clone(),
        })
    }

    /// Address used for `endpoint`.
    pub fn url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Optimize => &self.optimize_url,
            Endpoint::Simulate => &self.simulate_url,
        }
    }

    fn post(&self, url: &str, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        debug!(url, user_message = %request.user_message, "advisory request");
        let transport = |source| AdvisoryError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "advisory service returned an error status");
            return Err(AdvisoryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(transport)?;
        AdvisoryResponse::from_json(&body).map_err(|source| AdvisoryError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl AdvisoryService for HttpAdvisoryClient {
    fn optimize(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        self.post(&self.optimize_url, request)
    }

    fn simulate(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        self.post(&self.simulate_url, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = AdvisoryError::Status {
            url: "http://planner/optimize".to_string(),
            status: 502,
        };
        assert_eq!(
            err.user_message(Endpoint::Optimize),
            "Connection Error: Could not reach the optimization engine at \
             http://planner/optimize. Please check your network connection."
        );
        assert_eq!(
            err.user_message(Endpoint::Simulate),
            "Could not run simulations. Please check connection."
        );
    }

    #[test]
    fn test_client_from_config() {
        let config = AdvisoryConfig::default();
        let client = HttpAdvisoryClient::from_config(&config).unwrap();
        assert_eq!(client.url(Endpoint::Optimize), config.optimize_url);
        assert_eq!(client.url(Endpoint::Simulate), config.simulate_url);
    }

    #[test]
    fn test_unreachable_service_is_transport_error() {
        let config = AdvisoryConfig {
            optimize_url: "http://127.0.0.1:9/optimize".to_string(),
            timeout_secs: 2,
            ..AdvisoryConfig::default()
        };
        let client = HttpAdvisoryClient::from_config(&config).unwrap();
        let request = AdvisoryRequest::new(&crate::models::Factory::new(), "optimize board");
        let err = client.optimize(&request).unwrap_err();
        assert!(matches!(err, AdvisoryError::Transport { .. }));
        assert_eq!(err.url(), Some("http://127.0.0.1:9/optimize"));
    }
}
