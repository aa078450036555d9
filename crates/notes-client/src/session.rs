//! Login state on top of the authenticated client
//!
//! Login stores both tokens and then fetches the profile; loading a saved
//! session validates the stored access token against `/api/auth/me`, which
//! itself goes through the refresh protocol.

use common::Secret;
use notes_auth::{Credentials, TokenKey, save_credentials};
use tracing::{debug, info, warn};

use crate::client::AuthenticatedHttpClient;
use crate::error::{Error, Result};
use crate::models::{RegisterRequest, RegistrationResponse, User};

pub struct Session {
    client: AuthenticatedHttpClient,
}

impl Session {
    pub fn new(client: AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AuthenticatedHttpClient {
        &self.client
    }

    /// Log in with email and password; returns the logged-in user.
    pub async fn login(&self, email: &str, password: &Secret<String>) -> Result<User> {
        validate_email(email)?;
        if password.is_blank() {
            return Err(Error::InvalidRequest("password must not be empty".into()));
        }

        let tokens = self
            .client
            .auth_server()
            .login(email.trim(), password)
            .await
            .map_err(Error::Auth)?;

        save_credentials(
            self.client.token_store().as_ref(),
            Credentials {
                access_token: Secret::new(tokens.access_token),
                refresh_token: Secret::new(tokens.refresh_token),
            },
        )
        .await
        .map_err(|e| Error::TokenStore(e.to_string()))?;

        let user = self.client.auth().me().await?;
        info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &Secret<String>,
        full_name: Option<&str>,
    ) -> Result<RegistrationResponse> {
        validate_email(email)?;
        if password.is_blank() {
            return Err(Error::InvalidRequest("password must not be empty".into()));
        }
        let request = RegisterRequest {
            email: email.trim().to_owned(),
            password: password.expose().clone(),
            full_name: full_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_owned),
        };
        self.client.auth().register(&request).await
    }

    /// Restore a saved session.
    ///
    /// Returns `None` when nobody is logged in or the stored credentials no
    /// longer work; in the latter case they are removed.
    pub async fn load_user(&self) -> Result<Option<User>> {
        let store = self.client.token_store();
        if store.get(TokenKey::Access).await.is_none() {
            debug!("no stored access token");
            return Ok(None);
        }

        match self.client.auth().me().await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "stored session is no longer valid");
                notes_auth::clear_credentials(store.as_ref())
                    .await
                    .map_err(|e| Error::TokenStore(e.to_string()))?;
                Ok(None)
            }
        }
    }

    pub async fn logout(&self) {
        self.client.logout().await;
    }
}

fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(Error::InvalidRequest(format!(
            "not a valid email address: {email}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email(" ada@example.com ").is_ok());
        assert!(validate_email("ada").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@").is_err());
    }

    use crate::navigator::LogNavigator;
    use axum::Form;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use notes_auth::{MemoryTokenStore, TokenStore};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    fn user_json() -> serde_json::Value {
        serde_json::json!({
            "id": "u1",
            "email": "ada@example.com",
            "role": "user",
            "status": "active",
            "is_email_verified": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
        })
    }

    async fn start_auth_api() -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let app = axum::Router::new()
                .route(
                    "/api/auth/login",
                    post(|Form(form): Form<HashMap<String, String>>| async move {
                        let ok = form.get("username").map(String::as_str)
                            == Some("ada@example.com")
                            && form.get("password").map(String::as_str) == Some("hunter2");
                        if ok {
                            (
                                StatusCode::OK,
                                axum::Json(serde_json::json!({
                                    "access_token": "access-1",
                                    "refresh_token": "refresh-1",
                                    "token_type": "bearer",
                                })),
                            )
                        } else {
                            (
                                StatusCode::UNAUTHORIZED,
                                axum::Json(serde_json::json!({"detail": "Incorrect email or password"})),
                            )
                        }
                    }),
                )
                .route(
                    "/api/auth/me",
                    get(|headers: HeaderMap| async move {
                        let auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("");
                        if auth == "Bearer access-1" {
                            (StatusCode::OK, axum::Json(user_json()))
                        } else {
                            (
                                StatusCode::UNAUTHORIZED,
                                axum::Json(serde_json::json!({"detail": "Not authenticated"})),
                            )
                        }
                    }),
                )
                .route(
                    "/api/auth/refresh",
                    post(|| async {
                        (
                            StatusCode::UNAUTHORIZED,
                            axum::Json(serde_json::json!({"detail": "Invalid refresh token"})),
                        )
                    }),
                );
            axum::serve(listener, app).await.unwrap();
        });

        (url, handle)
    }

    fn session_for(url: &str, store: Arc<MemoryTokenStore>) -> Session {
        Session::new(AuthenticatedHttpClient::with_http_client(
            reqwest::Client::new(),
            url,
            store,
            Arc::new(LogNavigator),
        ))
    }

    #[tokio::test]
    async fn login_stores_both_tokens_and_returns_user() {
        let (url, _server) = start_auth_api().await;
        let store = Arc::new(MemoryTokenStore::new());
        let session = session_for(&url, store.clone());

        let user = session
            .login("ada@example.com", &Secret::from("hunter2"))
            .await
            .unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(
            store.get(TokenKey::Access).await.unwrap().expose(),
            "access-1"
        );
        assert_eq!(
            store.get(TokenKey::Refresh).await.unwrap().expose(),
            "refresh-1"
        );
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_without_storing() {
        let (url, _server) = start_auth_api().await;
        let store = Arc::new(MemoryTokenStore::new());
        let session = session_for(&url, store.clone());

        let err = session
            .login("ada@example.com", &Secret::from("wrong"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::Auth(notes_auth::Error::InvalidCredentials(_))),
            "got: {err:?}"
        );
        assert!(store.get(TokenKey::Access).await.is_none());
    }

    #[tokio::test]
    async fn load_user_without_tokens_is_none() {
        let (url, _server) = start_auth_api().await;
        let session = session_for(&url, Arc::new(MemoryTokenStore::new()));
        assert!(session.load_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn load_user_with_valid_token() {
        let (url, _server) = start_auth_api().await;
        let store = Arc::new(MemoryTokenStore::with_credentials("access-1", "refresh-1"));
        let session = session_for(&url, store);
        let user = session.load_user().await.unwrap().unwrap();
        assert_eq!(user.id, "u1");
    }

    #[tokio::test]
    async fn load_user_with_dead_session_clears_it() {
        let (url, _server) = start_auth_api().await;
        let store = Arc::new(MemoryTokenStore::with_credentials("stale", "revoked"));
        let session = session_for(&url, store.clone());

        assert!(session.load_user().await.unwrap().is_none());
        assert!(store.get(TokenKey::Access).await.is_none());
        assert!(store.get(TokenKey::Refresh).await.is_none());
    }
}
