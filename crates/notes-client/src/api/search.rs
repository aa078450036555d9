//! Semantic and keyword search, plus embedding maintenance

use crate::api::segment;
use crate::client::AuthenticatedHttpClient;
use crate::error::{Error, Result};
use crate::models::{
    EmbeddingStats, EmbeddingsCreated, KeywordSearchQuery, KeywordSearchResponse, MessageResponse,
    RebuildReport, SearchQuery, SearchResponse,
};
use crate::request::ApiRequest;

pub struct SearchApi<'a> {
    client: &'a AuthenticatedHttpClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) fn new(client: &'a AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    pub async fn semantic(&self, query: &SearchQuery) -> Result<SearchResponse> {
        if query.query.trim().is_empty() {
            return Err(Error::InvalidRequest("search query must not be empty".into()));
        }
        let req = ApiRequest::post("/api/search/semantic").json(query)?;
        self.client.send_json(&req).await
    }

    pub async fn keyword(&self, query: &KeywordSearchQuery) -> Result<KeywordSearchResponse> {
        if query.keywords.trim().is_empty() {
            return Err(Error::InvalidRequest("keywords must not be empty".into()));
        }
        let req = ApiRequest::post("/api/search/keywords").json(query)?;
        self.client.send_json(&req).await
    }

    pub async fn create_embeddings(&self, note_id: &str) -> Result<EmbeddingsCreated> {
        let path = format!("/api/search/notes/{}/embed", segment("note", note_id)?);
        self.client.send_json(&ApiRequest::post(path)).await
    }

    pub async fn embedding_stats(&self, note_id: &str) -> Result<EmbeddingStats> {
        let path = format!(
            "/api/search/notes/{}/embedding-stats",
            segment("note", note_id)?
        );
        self.client.send_json(&ApiRequest::get(path)).await
    }

    pub async fn delete_embeddings(&self, note_id: &str) -> Result<MessageResponse> {
        let path = format!("/api/search/notes/{}/embeddings", segment("note", note_id)?);
        self.client.send_json(&ApiRequest::delete(path)).await
    }

    pub async fn rebuild_all(&self) -> Result<RebuildReport> {
        self.client
            .send_json(&ApiRequest::post("/api/search/rebuild-all"))
            .await
    }
}
