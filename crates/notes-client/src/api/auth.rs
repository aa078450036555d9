//! Account endpoints that go through the authenticated client
//!
//! Login, refresh and logout live on `notes_auth::AuthServer`; everything
//! else under `/api/auth` is here.

use common::Secret;
use notes_auth::ME_PATH;

use crate::client::AuthenticatedHttpClient;
use crate::error::Result;
use crate::models::{MessageResponse, RegisterRequest, RegistrationResponse, User};
use crate::request::ApiRequest;

pub struct AuthApi<'a> {
    client: &'a AuthenticatedHttpClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegistrationResponse> {
        let req = ApiRequest::post("/api/auth/register").json(request)?;
        self.client.send_json(&req).await
    }

    pub async fn verify_email(&self, token: &str) -> Result<MessageResponse> {
        let req = ApiRequest::post("/api/auth/verify-email")
            .json(&serde_json::json!({ "token": token }))?;
        self.client.send_json(&req).await
    }

    pub async fn resend_verification(&self, email: &str) -> Result<MessageResponse> {
        let req = ApiRequest::post("/api/auth/resend-verification")
            .json(&serde_json::json!({ "email": email }))?;
        self.client.send_json(&req).await
    }

    /// Profile of the user owning the current access token.
    pub async fn me(&self) -> Result<User> {
        self.client.send_json(&ApiRequest::get(ME_PATH)).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        let req = ApiRequest::post("/api/auth/forgot-password")
            .json(&serde_json::json!({ "email": email }))?;
        self.client.send_json(&req).await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &Secret<String>,
    ) -> Result<MessageResponse> {
        let req = ApiRequest::post("/api/auth/reset-password").json(&serde_json::json!({
            "token": token,
            "new_password": new_password.expose(),
        }))?;
        self.client.send_json(&req).await
    }

    pub async fn verify_reset_code(&self, token: &str) -> Result<MessageResponse> {
        let req = ApiRequest::post("/api/auth/verify-reset-code")
            .json(&serde_json::json!({ "token": token }))?;
        self.client.send_json(&req).await
    }

    pub async fn change_password(
        &self,
        current_password: &Secret<String>,
        new_password: &Secret<String>,
    ) -> Result<MessageResponse> {
        let req = ApiRequest::post("/api/auth/change-password").json(&serde_json::json!({
            "current_password": current_password.expose(),
            "new_password": new_password.expose(),
        }))?;
        self.client.send_json(&req).await
    }
}
