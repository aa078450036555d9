//! Note CRUD, trash, upload/download, summarization and tag suggestion

use bytes::Bytes;

use crate::api::{paginate, segment};
use crate::client::AuthenticatedHttpClient;
use crate::error::{Error, Result};
use crate::models::{
    MessageResponse, Note, NoteCreate, NoteCreateResponse, NoteListParams, NoteListResponse,
    NoteSummary, NoteUpdate, Pagination, TagSuggestionResponse,
};
use crate::request::{ApiRequest, MultipartPart};

/// File contents for `NotesApi::upload`.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

pub struct NotesApi<'a> {
    client: &'a AuthenticatedHttpClient,
}

impl<'a> NotesApi<'a> {
    pub(crate) fn new(client: &'a AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, note: &NoteCreate) -> Result<NoteCreateResponse> {
        if note.title.trim().is_empty() {
            return Err(Error::InvalidRequest("note title must not be empty".into()));
        }
        let req = ApiRequest::post("/api/notes").json(note)?;
        self.client.send_json(&req).await
    }

    /// Create a note from a file. Tags are sent comma-joined.
    pub async fn upload(
        &self,
        title: &str,
        file: Upload,
        tags: &[String],
    ) -> Result<NoteCreateResponse> {
        if title.trim().is_empty() {
            return Err(Error::InvalidRequest("note title must not be empty".into()));
        }
        let mut parts = vec![
            MultipartPart::file("file", file.file_name, file.content_type, file.bytes),
            MultipartPart::text("title", title),
        ];
        if !tags.is_empty() {
            parts.push(MultipartPart::text("tags", tags.join(",")));
        }
        let req = ApiRequest::post("/api/notes/upload").multipart(parts);
        self.client.send_json(&req).await
    }

    pub async fn list(&self, params: &NoteListParams) -> Result<NoteListResponse> {
        let req = paginate(ApiRequest::get("/api/notes"), params.page)
            .query_opt("search", params.search.as_deref())
            .query_opt("is_pinned", params.is_pinned)
            .query_opt("is_archived", params.is_archived)
            .query_opt("note_ids", params.note_ids.as_deref())
            .query_opt("sort_by", params.sort_by.as_deref());
        self.client.send_json(&req).await
    }

    pub async fn get(&self, note_id: &str) -> Result<Note> {
        let path = format!("/api/notes/{}", segment("note", note_id)?);
        self.client.send_json(&ApiRequest::get(path)).await
    }

    pub async fn update(&self, note_id: &str, update: &NoteUpdate) -> Result<Note> {
        if update.is_empty() {
            return Err(Error::InvalidRequest("note update changes nothing".into()));
        }
        let path = format!("/api/notes/{}", segment("note", note_id)?);
        let req = ApiRequest::patch(path).json(update)?;
        self.client.send_json(&req).await
    }

    /// Move a note to the trash.
    pub async fn delete(&self, note_id: &str) -> Result<MessageResponse> {
        let path = format!("/api/notes/{}", segment("note", note_id)?);
        self.client.send_json(&ApiRequest::delete(path)).await
    }

    pub async fn restore(&self, note_id: &str) -> Result<Note> {
        let path = format!("/api/notes/{}/restore", segment("note", note_id)?);
        self.client.send_json(&ApiRequest::post(path)).await
    }

    pub async fn toggle_pin(&self, note_id: &str) -> Result<Note> {
        let path = format!("/api/notes/{}/pin", segment("note", note_id)?);
        self.client.send_json(&ApiRequest::post(path)).await
    }

    pub async fn toggle_archive(&self, note_id: &str) -> Result<Note> {
        let path = format!("/api/notes/{}/archive", segment("note", note_id)?);
        self.client.send_json(&ApiRequest::post(path)).await
    }

    pub async fn trash(&self, page: Pagination) -> Result<NoteListResponse> {
        let req = paginate(ApiRequest::get("/api/notes/trash/list"), page);
        self.client.send_json(&req).await
    }

    pub async fn permanently_delete(&self, note_id: &str) -> Result<MessageResponse> {
        let path = format!("/api/notes/{}/permanent", segment("note", note_id)?);
        self.client.send_json(&ApiRequest::delete(path)).await
    }

    /// Ask the API whether every id refers to a note the user owns.
    pub async fn validate_note_ids(&self, note_ids: &[String]) -> Result<MessageResponse> {
        let mut req = ApiRequest::get("/api/notes/validate/note-ids");
        for id in note_ids {
            req = req.query("note_ids", segment("note", id)?);
        }
        self.client.send_json(&req).await
    }

    pub async fn summarize(&self, note_id: &str) -> Result<NoteSummary> {
        let path = format!("/api/notes/{}/summarize", segment("note", note_id)?);
        self.client.send_json(&ApiRequest::post(path)).await
    }

    /// Suggest tags for a stored note, optionally for unsaved `content`.
    pub async fn suggest_tags(
        &self,
        note_id: &str,
        content: Option<&str>,
    ) -> Result<TagSuggestionResponse> {
        let path = format!("/api/notes/{}/suggest-tags", segment("note", note_id)?);
        let req = ApiRequest::post(path).json(&serde_json::json!({ "content": content }))?;
        self.client.send_json(&req).await
    }

    /// Raw bytes of the file a note was created from.
    pub async fn download(&self, note_id: &str) -> Result<Bytes> {
        let path = format!("/api/notes/{}/download", segment("note", note_id)?);
        Ok(self.client.send(&ApiRequest::get(path)).await?.into_bytes())
    }
}
