//! Wire types for the notes API
//!
//! Timestamps are kept as the RFC 3339 strings the API sends.

use serde::{Deserialize, Serialize};

// --- Users ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_email_verified: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

// --- Auth ---

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub message: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// --- Notes ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSourceType {
    Text,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub source_type: NoteSourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteCreate {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NoteUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteListResponse {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<Note>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteCreateResponse {
    pub note: Note,
    #[serde(default)]
    pub suggested_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagSuggestionResponse {
    pub note_id: String,
    pub suggestions: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSummary {
    pub note_id: String,
    pub summary: String,
    pub original_length: u64,
    pub summary_length: u64,
}

/// Skip/limit paging shared by every list endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// Filters for `GET /api/notes`.
#[derive(Debug, Clone, Default)]
pub struct NoteListParams {
    pub page: Pagination,
    pub search: Option<String>,
    pub is_pinned: Option<bool>,
    pub is_archived: Option<bool>,
    /// Comma-separated note ids
    pub note_ids: Option<String>,
    pub sort_by: Option<String>,
}

// --- Q&A ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaMessage {
    pub id: String,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaSession {
    pub id: String,
    pub user_id: String,
    pub note_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub messages: Vec<QaMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QaSessionCreate {
    pub note_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QaSessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceNote {
    pub note_id: String,
    pub note_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaMessageResponse {
    pub message_id: String,
    pub user_message: String,
    pub ai_response: String,
    #[serde(default)]
    pub source_notes: Vec<SourceNote>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaSessionListResponse {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<QaSession>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaSessionSummary {
    pub session_id: String,
    pub title: String,
    pub note_count: u64,
    pub message_count: u64,
    pub user_messages: u64,
    pub ai_messages: u64,
    pub created_at: String,
    pub updated_at: String,
}

// --- Search ---

#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordSearchQuery {
    pub keywords: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_id: Option<String>,
    pub note_id: String,
    pub note_title: String,
    pub chunk_text: String,
    pub relevance_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub result_count: u64,
    pub results: Vec<SearchResult>,
    pub search_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSearchResult {
    pub note_id: String,
    pub note_title: String,
    pub chunk_text: String,
    #[serde(rename = "type")]
    pub match_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSearchResponse {
    pub keywords: String,
    pub result_count: u64,
    pub results: Vec<KeywordSearchResult>,
    pub search_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsCreated {
    pub note_id: String,
    pub embeddings_created: u64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingStats {
    pub note_id: String,
    pub note_title: String,
    pub note_length: u64,
    pub embedding_count: u64,
    pub content_preview: String,
    pub is_indexed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebuildReport {
    pub total_notes: u64,
    pub total_embeddings: u64,
    pub status: String,
}

// --- Admin ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_users: u64,
    pub total_notes: u64,
    pub active_users: u64,
    pub notes_created_today: u64,
    pub notes_created_this_week: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAdminView {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_email_verified: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    pub notes_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<UserAdminView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_deserializes_with_optional_fields_missing() {
        let json = r#"{
            "id": "n1", "user_id": "u1", "title": "Groceries", "content": "milk",
            "source_type": "text", "is_pinned": false, "is_archived": false,
            "is_deleted": false, "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.source_type, NoteSourceType::Text);
        assert!(note.tags.is_empty());
        assert!(note.summary.is_none());
    }

    #[test]
    fn roles_use_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<UserStatus>("\"inactive\"").unwrap(),
            UserStatus::Inactive
        );
    }

    #[test]
    fn note_update_omits_unset_fields() {
        let update = NoteUpdate {
            title: Some("Renamed".into()),
            ..NoteUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"title": "Renamed"})
        );
        assert!(!update.is_empty());
        assert!(NoteUpdate::default().is_empty());
    }

    #[test]
    fn keyword_result_maps_type_field() {
        let json = r#"{"note_id":"n1","note_title":"t","chunk_text":"c","type":"title"}"#;
        let result: KeywordSearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.match_type, "title");
    }
}
