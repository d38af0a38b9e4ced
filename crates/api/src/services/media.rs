//! Media relay client for hosting product images.
//!
//! Relays raw image bytes to an imgbb-style image host and returns the
//! publicly addressable URL. The service never decodes or transforms the
//! bytes; the returned URL is stored verbatim as an opaque string.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::config::MediaRelayConfig;

/// Image host upload endpoint.
const UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

/// Upper bound on the whole relay round trip. The upload request is held
/// open while we wait, so this must never be unbounded.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when relaying an image to the media host.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay did not answer within [`REQUEST_TIMEOUT`].
    #[error("media relay timed out")]
    Timeout,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Relay returned an error response.
    #[error("relay error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the relay response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Response body from the image host.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: UploadData,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
}

/// Client for the image-host relay.
#[derive(Clone)]
pub struct MediaRelayClient {
    client: reqwest::Client,
    api_key: SecretString,
}

impl MediaRelayClient {
    /// Create a new media relay client with a bounded request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MediaRelayConfig) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RelayError::Http)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }

    /// Upload image bytes and return the hosted URL.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Timeout` if the host does not answer in time,
    /// `RelayError::Api` on a non-success response, and `RelayError::Http`
    /// or `RelayError::Parse` on transport or body failures.
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, RelayError> {
        let form = Form::new().part("image", Part::bytes(bytes).file_name(filename.to_string()));

        let response = self
            .client
            .post(UPLOAD_URL)
            .query(&[("key", self.api_key.expose_secret())])
            .multipart(form)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RelayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| RelayError::Parse(e.to_string()))?;

        tracing::info!(filename = %filename, url = %body.data.url, "Image relayed to media host");
        Ok(body.data.url)
    }
}

/// Separate timeouts from other transport failures so the caller can map
/// them to a distinct status.
fn classify(error: reqwest::Error) -> RelayError {
    if error.is_timeout() {
        RelayError::Timeout
    } else {
        RelayError::Http(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_status() {
        let err = RelayError::Api {
            status: 400,
            message: "invalid key".to_string(),
        };
        assert_eq!(err.to_string(), "relay error: 400 - invalid key");
    }
}
