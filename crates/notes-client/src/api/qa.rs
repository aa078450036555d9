//! Question-answering sessions over selected notes

use crate::api::{paginate, segment};
use crate::client::AuthenticatedHttpClient;
use crate::error::{Error, Result};
use crate::models::{
    MessageResponse, Pagination, QaMessage, QaMessageResponse, QaSession, QaSessionCreate,
    QaSessionListResponse, QaSessionSummary, QaSessionUpdate,
};
use crate::request::ApiRequest;

pub struct QaApi<'a> {
    client: &'a AuthenticatedHttpClient,
}

impl<'a> QaApi<'a> {
    pub(crate) fn new(client: &'a AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    pub async fn create_session(&self, session: &QaSessionCreate) -> Result<QaSession> {
        if session.note_ids.is_empty() {
            return Err(Error::InvalidRequest(
                "a session needs at least one note".into(),
            ));
        }
        let req = ApiRequest::post("/api/qa/sessions").json(session)?;
        self.client.send_json(&req).await
    }

    pub async fn list_sessions(&self, page: Pagination) -> Result<QaSessionListResponse> {
        let req = paginate(ApiRequest::get("/api/qa/sessions"), page);
        self.client.send_json(&req).await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<QaSession> {
        let path = format!("/api/qa/sessions/{}", segment("session", session_id)?);
        self.client.send_json(&ApiRequest::get(path)).await
    }

    pub async fn update_session(
        &self,
        session_id: &str,
        update: &QaSessionUpdate,
    ) -> Result<QaSession> {
        let path = format!("/api/qa/sessions/{}", segment("session", session_id)?);
        let req = ApiRequest::patch(path).json(update)?;
        self.client.send_json(&req).await
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<MessageResponse> {
        let path = format!("/api/qa/sessions/{}", segment("session", session_id)?);
        self.client.send_json(&ApiRequest::delete(path)).await
    }

    pub async fn messages(&self, session_id: &str) -> Result<Vec<QaMessage>> {
        let path = format!(
            "/api/qa/sessions/{}/messages",
            segment("session", session_id)?
        );
        self.client.send_json(&ApiRequest::get(path)).await
    }

    /// Ask a question; the answer is generated from the session's notes.
    pub async fn send_message(&self, session_id: &str, content: &str) -> Result<QaMessageResponse> {
        if content.trim().is_empty() {
            return Err(Error::InvalidRequest("question must not be empty".into()));
        }
        let path = format!(
            "/api/qa/sessions/{}/messages",
            segment("session", session_id)?
        );
        let req = ApiRequest::post(path).json(&serde_json::json!({ "content": content }))?;
        self.client.send_json(&req).await
    }

    pub async fn session_summary(&self, session_id: &str) -> Result<QaSessionSummary> {
        let path = format!(
            "/api/qa/sessions/{}/summary",
            segment("session", session_id)?
        );
        self.client.send_json(&ApiRequest::get(path)).await
    }
}
