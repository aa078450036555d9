//! Client for the personal notes API
//!
//! `AuthenticatedHttpClient` attaches the stored access token to every
//! request and, on a 401, refreshes it once and retries once. The typed
//! endpoint groups (`auth`, `notes`, `qa`, `search`, `admin`) and `Session`
//! are built on top of it.
//!
//! Request flow:
//! 1. Read the credential pair from the `TokenStore`
//! 2. Send with `Authorization: Bearer <access>`
//! 3. On 401: refresh via `AuthServer`, store the new access token, retry
//! 4. If refresh is impossible: clear tokens, `Navigator::redirect_to_login()`

pub mod api;
pub mod client;
pub mod error;
pub mod metrics;
pub mod models;
pub mod navigator;
pub mod request;
pub mod session;

pub use api::notes::Upload;
pub use client::{Attempt, AuthenticatedHttpClient, ClientConfig, RequestPhase};
pub use error::{Error, Result};
pub use navigator::{LogNavigator, Navigator};
pub use request::{ApiRequest, ApiResponse, MultipartPart, PartValue, RequestBody};
pub use session::Session;
