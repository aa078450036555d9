//! Typed endpoint groups
//!
//! Each group borrows the authenticated client, so every call goes through
//! the same bearer-token and refresh handling.

pub mod admin;
pub mod auth;
pub mod notes;
pub mod qa;
pub mod search;

use serde::de::DeserializeOwned;

use crate::client::AuthenticatedHttpClient;
use crate::error::{Error, Result};
use crate::models::Pagination;
use crate::request::ApiRequest;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use notes::NotesApi;
pub use qa::QaApi;
pub use search::SearchApi;

impl AuthenticatedHttpClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn notes(&self) -> NotesApi<'_> {
        NotesApi::new(self)
    }

    pub fn qa(&self) -> QaApi<'_> {
        QaApi::new(self)
    }

    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    /// Send a request and decode a JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        self.send(request).await?.json()
    }
}

/// Validate an id before splicing it into a URL path.
pub(crate) fn segment<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::InvalidRequest(format!("{kind} id must not be empty")));
    }
    if id.contains(['/', '?', '#']) {
        return Err(Error::InvalidRequest(format!(
            "{kind} id contains a reserved character: {id}"
        )));
    }
    Ok(id)
}

pub(crate) fn paginate(request: ApiRequest, page: Pagination) -> ApiRequest {
    request
        .query_opt("skip", page.skip)
        .query_opt("limit", page.limit)
}
