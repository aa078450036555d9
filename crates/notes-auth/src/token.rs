//! Auth server calls: login, token refresh, logout
//!
//! The notes API takes the refresh token as a query parameter on both the
//! refresh and logout endpoints, and expects login credentials as an
//! urlencoded form (`username` carries the email address).

use common::Secret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{LOGIN_PATH, LOGOUT_PATH, REFRESH_PATH};
use crate::error::{Error, Result};

/// Response from the login endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Seconds until the access token expires
    #[serde(default)]
    pub expires_in: u64,
}

fn default_token_type() -> String {
    "bearer".into()
}

/// Response from the refresh endpoint. The refresh token is never rotated.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Client for the auth endpoints of the notes API.
#[derive(Clone)]
pub struct AuthServer {
    client: reqwest::Client,
    base_url: String,
}

impl AuthServer {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange an email and password for a token pair.
    pub async fn login(&self, email: &str, password: &Secret<String>) -> Result<TokenResponse> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .form(&[("username", email), ("password", password.expose().as_str())])
            .send()
            .await
            .map_err(|e| Error::Http(format!("login request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(Error::InvalidCredentials(format!(
                    "login rejected ({status}): {body}"
                )));
            }
            return Err(Error::TokenExchange(format!(
                "login returned {status}: {body}"
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| Error::TokenExchange(format!("invalid login response: {e}")))
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(&self, refresh: &Secret<String>) -> Result<RefreshResponse> {
        let response = self
            .client
            .post(self.url(REFRESH_PATH))
            .query(&[("refresh_token", refresh.expose().as_str())])
            .send()
            .await
            .map_err(|e| Error::Http(format!("token refresh request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));

            // 401/403 means the refresh token is revoked or expired
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(Error::InvalidCredentials(format!(
                    "refresh token rejected ({status}): {body}"
                )));
            }

            return Err(Error::TokenExchange(format!(
                "token refresh returned {status}: {body}"
            )));
        }

        let refreshed = response
            .json::<RefreshResponse>()
            .await
            .map_err(|e| Error::TokenExchange(format!("invalid refresh response: {e}")))?;
        if refreshed.access_token.is_empty() {
            return Err(Error::TokenExchange(
                "refresh response carried an empty access token".into(),
            ));
        }
        debug!("access token refreshed");
        Ok(refreshed)
    }

    /// Invalidate a refresh token server-side.
    pub async fn logout(&self, refresh: &Secret<String>) -> Result<()> {
        let response = self
            .client
            .post(self.url(LOGOUT_PATH))
            .query(&[("refresh_token", refresh.expose().as_str())])
            .send()
            .await
            .map_err(|e| Error::Http(format!("logout request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(Error::TokenExchange(format!(
                "logout returned {status}: {body}"
            )));
        }
        Ok(())
    }
}
