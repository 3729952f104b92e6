use std::time::Duration;

use tracing::debug;

use crate::{Error, Result};

/// Blocking HTTP transport bound to one base URL.
///
/// The transport owns no connection state: each call builds its own
/// `reqwest` client, scoped to the call, so every exit path releases the
/// underlying resources.
pub struct HttpTransport {
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: user_agent.into(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and return the parsed JSON response.
    ///
    /// A non-success status becomes [`Error::Api`] carrying the status code
    /// and raw body; a request that never completes (DNS, connect, timeout)
    /// becomes [`Error::Transport`].
    pub fn post_json(
        &self,
        path: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        debug!(%url, "sending chat completion request");
        let response = client
            .post(&url)
            .header("Infuzu-API-Key", api_key)
            .json(body)
            .send()
            .map_err(TransportError::Http)?;

        let status = response.status();
        let body = response.text().map_err(TransportError::Http)?;
        debug!(status = status.as_u16(), "received response");

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::validation(format!("response body is not valid JSON: {e}")))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
