// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with authentication and status handling.

use reqwest::{Client, Method, RequestBuilder, Response};

use crate::config::{AuthMethod, CalDavConfig};
use crate::error::CalDavError;

/// HTTP client for `CalDAV` operations.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: CalDavConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: CalDavConfig) -> Result<Self, CalDavError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds a request with authentication headers.
    pub fn build_request(&self, method: Method, url: &str) -> RequestBuilder {
        let req = self.client.request(method, url);
        match &self.config.auth {
            AuthMethod::Basic { username, password } => req.basic_auth(username, Some(password)),
            AuthMethod::Bearer { token } => req.bearer_auth(token),
            AuthMethod::None => req,
        }
    }

    /// Sends a request and returns the response whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn send(&self, req: RequestBuilder) -> Result<Response, CalDavError> {
        Ok(req.send().await?)
    }

    /// Sends a request and fails on any non-success status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns an error status code.
    pub async fn execute(&self, req: RequestBuilder) -> Result<Response, CalDavError> {
        let resp = self.send(req).await?;
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(Self::status_error(resp).await)
        }
    }

    /// Turns an unexpected response into [`CalDavError::Status`].
    pub async fn status_error(resp: Response) -> CalDavError {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());
        CalDavError::Status { status, body }
    }
}
