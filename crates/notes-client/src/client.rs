//! Authenticated HTTP client with one-shot token refresh
//!
//! Every request gets `Authorization: Bearer <access token>` from the token
//! store. A 401 on the first attempt triggers exactly one refresh through the
//! auth server followed by exactly one retry; a 401 on the retry is returned
//! to the caller as-is. When a refresh is impossible or fails, both tokens
//! are cleared, the navigator is asked to show the login view, and the call
//! fails with `AuthenticationExpired`.
//!
//! Per-request phases:
//! - Unsent → Sent
//! - Sent → Succeeded | Failed | NeedsRefresh
//! - NeedsRefresh → Refreshing
//! - Refreshing → RetriedSent | RefreshFailed
//! - RetriedSent → Succeeded | Failed
//! - RefreshFailed → Failed

use std::sync::Arc;
use std::time::Duration;

use common::Secret;
use notes_auth::{
    AuthServer, BEARER_PREFIX, CredentialState, DEFAULT_API_URL, TokenKey, TokenStore,
    clear_credentials, load_credentials,
};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use tokio::sync::Mutex;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::error::{Error, Result};
use crate::metrics;
use crate::navigator::Navigator;
use crate::request::{ApiRequest, ApiResponse};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Which attempt of a request is being issued.
///
/// Only ever moves forward: a request that has been retried can not become
/// eligible for another refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    Retry,
}

impl Attempt {
    pub fn is_retry(self) -> bool {
        matches!(self, Attempt::Retry)
    }
}

/// Lifecycle phase of a single request, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Unsent,
    Sent,
    Succeeded,
    Failed,
    NeedsRefresh,
    Refreshing,
    RetriedSent,
    RefreshFailed,
}

impl RequestPhase {
    pub fn label(&self) -> &'static str {
        match self {
            RequestPhase::Unsent => "unsent",
            RequestPhase::Sent => "sent",
            RequestPhase::Succeeded => "succeeded",
            RequestPhase::Failed => "failed",
            RequestPhase::NeedsRefresh => "needs_refresh",
            RequestPhase::Refreshing => "refreshing",
            RequestPhase::RetriedSent => "retried_sent",
            RequestPhase::RefreshFailed => "refresh_failed",
        }
    }

    pub fn can_transition_to(&self, next: RequestPhase) -> bool {
        use RequestPhase::*;
        matches!(
            (self, next),
            (Unsent, Sent)
                | (Sent, Succeeded | Failed | NeedsRefresh)
                | (NeedsRefresh, Refreshing)
                | (Refreshing, RetriedSent | RefreshFailed)
                | (RetriedSent, Succeeded | Failed)
                | (RefreshFailed, Failed)
        )
    }

    fn advance(&mut self, next: RequestPhase) {
        debug_assert!(
            self.can_transition_to(next),
            "invalid request phase transition {} -> {}",
            self.label(),
            next.label()
        );
        debug!(from = self.label(), to = next.label(), "request phase");
        *self = next;
    }
}

/// Connection settings for the API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client that attaches bearer tokens and recovers from one expired
/// access token per request.
///
/// Cheap to clone; clones share the token store, navigator and refresh lock.
#[derive(Clone)]
pub struct AuthenticatedHttpClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    auth: AuthServer,
    /// Serializes refreshes so concurrent 401s share one refresh call
    refresh_lock: Mutex<()>,
}

impl AuthenticatedHttpClient {
    /// Build a client with its own `reqwest::Client` honoring `config.timeout`.
    pub fn new(
        config: &ClientConfig,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(Error::InvalidRequest(format!(
                "base_url must start with http:// or https://, got: {}",
                config.base_url
            )));
        }
        if config.timeout.is_zero() {
            return Err(Error::InvalidRequest(
                "timeout must be greater than 0".into(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::InvalidRequest(format!("building HTTP client: {e}")))?;
        Ok(Self::with_http_client(
            http,
            &config.base_url,
            store,
            navigator,
        ))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let auth = AuthServer::new(http.clone(), base_url.clone());
        Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                store,
                navigator,
                auth,
                refresh_lock: Mutex::new(()),
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn auth_server(&self) -> &AuthServer {
        &self.inner.auth
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    /// Issue a request, refreshing the access token and retrying once on 401.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let request_id = format!("req_{}", uuid::Uuid::new_v4().simple());
        let span = info_span!(
            "api_request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.path(),
        );
        self.send_inner(request, &request_id).instrument(span).await
    }

    async fn send_inner(&self, request: &ApiRequest, request_id: &str) -> Result<ApiResponse> {
        let mut phase = RequestPhase::Unsent;
        let mut attempt = Attempt::Initial;
        let mut bearer = self.inner.current_access_token().await;

        loop {
            phase.advance(if attempt.is_retry() {
                RequestPhase::RetriedSent
            } else {
                RequestPhase::Sent
            });

            let response = match self
                .inner
                .dispatch(request, request_id, bearer.as_ref(), attempt)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    phase.advance(RequestPhase::Failed);
                    return Err(e);
                }
            };

            if response.status() != StatusCode::UNAUTHORIZED {
                let result = into_result(response);
                phase.advance(if result.is_ok() {
                    RequestPhase::Succeeded
                } else {
                    RequestPhase::Failed
                });
                return result;
            }

            if attempt.is_retry() {
                warn!("request rejected again after token refresh");
                phase.advance(RequestPhase::Failed);
                return Err(Error::Unauthorized(response.text()));
            }

            // Marked before refreshing so this request can never refresh twice
            attempt = Attempt::Retry;
            phase.advance(RequestPhase::NeedsRefresh);
            phase.advance(RequestPhase::Refreshing);

            // The refresh runs in its own task so that a caller abandoning
            // this request can not interrupt the token store update.
            let inner = self.inner.clone();
            let sent_with = bearer.clone();
            let refreshed = tokio::spawn(
                async move { inner.refresh_after_unauthorized(sent_with).await }
                    .in_current_span(),
            )
            .await
            .unwrap_or_else(|e| {
                Err(Error::AuthenticationExpired {
                    reason: format!("refresh task aborted: {e}"),
                    source: None,
                })
            });

            match refreshed {
                Ok(token) => bearer = Some(token),
                Err(e) => {
                    phase.advance(RequestPhase::RefreshFailed);
                    phase.advance(RequestPhase::Failed);
                    return Err(e);
                }
            }
        }
    }

    /// Best-effort server logout, then unconditional local credential removal.
    pub async fn logout(&self) {
        match self.inner.store.get(TokenKey::Refresh).await {
            Some(refresh) => {
                if let Err(e) = self.inner.auth.logout(&refresh).await {
                    warn!(error = %e, "server logout failed, clearing local credentials anyway");
                }
            }
            None => debug!("no refresh token stored, skipping server logout"),
        }
        if let Err(e) = clear_credentials(self.inner.store.as_ref()).await {
            warn!(error = %e, "failed to clear credentials on logout");
        }
        info!("logged out");
    }
}

impl Inner {
    /// Access token to present, if a complete credential pair is stored.
    ///
    /// A lone token is discarded: it can neither authenticate nor be
    /// refreshed.
    async fn current_access_token(&self) -> Option<Secret<String>> {
        match load_credentials(self.store.as_ref()).await {
            CredentialState::Present(credentials) => Some(credentials.access_token),
            CredentialState::Partial => {
                warn!("partial credentials in token store, discarding");
                if let Err(e) = clear_credentials(self.store.as_ref()).await {
                    warn!(error = %e, "failed to clear partial credentials");
                }
                None
            }
            CredentialState::Absent => None,
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        request_id: &str,
        bearer: Option<&Secret<String>>,
        attempt: Attempt,
    ) -> Result<ApiResponse> {
        let mut headers = request.headers().clone();
        if let Some(token) = bearer {
            // Callers may pin their own Authorization header on the first
            // attempt; a retry always carries the refreshed token.
            if attempt.is_retry() || !headers.contains_key(AUTHORIZATION) {
                headers.insert(AUTHORIZATION, bearer_header(token)?);
            }
        }
        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert(REQUEST_ID_HEADER, value);
        }

        let response = request
            .build(&self.http, &self.base_url, headers)?
            .send()
            .await
            .map_err(|e| Error::Network(format!("request to {} failed: {e}", request.path())))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| {
            Error::Network(format!("reading response from {}: {e}", request.path()))
        })?;

        metrics::record_response(status.as_u16());
        debug!(status = status.as_u16(), retry = attempt.is_retry(), "response received");
        Ok(ApiResponse::new(status, headers, body))
    }

    /// Obtain a usable access token after a 401.
    ///
    /// Holds the refresh lock for the whole read-refresh-store sequence. If
    /// another request already replaced the token this one was sent with,
    /// that token is reused instead of refreshing again.
    async fn refresh_after_unauthorized(
        &self,
        sent_with: Option<Secret<String>>,
    ) -> Result<Secret<String>> {
        let _guard = self.refresh_lock.lock().await;

        let credentials = match load_credentials(self.store.as_ref()).await {
            CredentialState::Present(credentials) => credentials,
            CredentialState::Absent if sent_with.is_some() => {
                // Sent with a token that has since been cleared: whoever
                // cleared it already sent the user to the login view.
                debug!("credentials cleared by another request, login required");
                return Err(Error::AuthenticationExpired {
                    reason: "credentials cleared while request was in flight".into(),
                    source: None,
                });
            }
            CredentialState::Partial | CredentialState::Absent => {
                warn!("401 with no refresh token stored, login required");
                self.deauthenticate("no_refresh_token").await;
                return Err(Error::AuthenticationExpired {
                    reason: "no refresh token stored".into(),
                    source: None,
                });
            }
        };

        if sent_with.is_none_or(|sent| sent != credentials.access_token) {
            debug!("access token already replaced, reusing it");
            metrics::record_refresh("reused");
            return Ok(credentials.access_token);
        }

        match self.auth.refresh(&credentials.refresh_token).await {
            Ok(refreshed) => {
                let token = Secret::new(refreshed.access_token);
                if let Err(e) = self.store.set(TokenKey::Access, token.clone()).await {
                    warn!(error = %e, "failed to persist refreshed access token");
                }
                metrics::record_refresh("success");
                info!("access token refreshed");
                Ok(token)
            }
            Err(e) => {
                let outcome = if e.is_network() { "network" } else { "rejected" };
                metrics::record_refresh(outcome);
                warn!(error = %e, "token refresh failed, login required");
                self.deauthenticate("refresh_failed").await;
                Err(Error::AuthenticationExpired {
                    reason: "token refresh failed".into(),
                    source: Some(e),
                })
            }
        }
    }

    /// Clear both tokens and send the user to the login view.
    async fn deauthenticate(&self, reason: &'static str) {
        if let Err(e) = clear_credentials(self.store.as_ref()).await {
            warn!(error = %e, "failed to clear credentials");
        }
        metrics::record_deauthentication(reason);
        self.navigator.redirect_to_login();
    }
}

fn bearer_header(token: &Secret<String>) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("{BEARER_PREFIX}{}", token.expose()))
        .map_err(|_| Error::InvalidRequest("stored access token is not a valid header".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn into_result(response: ApiResponse) -> Result<ApiResponse> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(Error::Server {
            status: response.status().as_u16(),
            body: response.text(),
        })
    }
}
