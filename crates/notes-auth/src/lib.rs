//! Credentials and auth-server calls for the notes API
//!
//! Holds the pieces the authenticated client builds on:
//! 1. `Credentials` and the `TokenStore` capability (memory or file backed)
//! 2. `AuthServer`, the thin wire layer for login, refresh and logout
//!
//! The auth server is reached with a plain `reqwest::Client`, never through
//! the authenticated client, so a failing refresh can not recurse into
//! another refresh.

pub mod constants;
pub mod credentials;
pub mod error;
pub mod file_store;
pub mod token;

pub use constants::*;
pub use credentials::{
    CredentialState, Credentials, MemoryTokenStore, StoreFuture, TokenKey, TokenStore,
    clear_credentials, load_credentials, save_credentials,
};
pub use error::{Error, Result};
pub use file_store::FileTokenStore;
pub use token::{AuthServer, RefreshResponse, TokenResponse};
