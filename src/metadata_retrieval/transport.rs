/// Network access for the API client.
use super::RetrievalError;
use humansize::{DECIMAL, format_size};
use std::time::Duration;

/// Fetches the body of a URL.
///
/// The client only ever issues plain GET requests; tests substitute an
/// in-memory implementation.
pub trait Transport {
    /// Performs a GET request and returns the full response body
    fn fetch(&self, url: &str) -> Result<Vec<u8>, RetrievalError>;
}

/// [`Transport`] backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Creates a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, RetrievalError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tvdb_client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RetrievalError::RequestError(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, RetrievalError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| RetrievalError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RetrievalError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .map_err(|e| RetrievalError::RequestError(e.to_string()))?;

        tracing::debug!(url, size = %format_size(body.len(), DECIMAL), "Fetched response");

        Ok(body.to_vec())
    }
}
