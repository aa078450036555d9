//! Credentials and the token store capability
//!
//! The token store is a small key/value capability with exactly two keys:
//! the access token and the refresh token. Credentials are meaningful only
//! as a pair. A store holding one token without the other is treated as
//! holding none, so callers read through `load_credentials` rather than
//! looking at the keys individually.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use common::Secret;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;

/// Boxed future returned by `TokenStore` methods.
///
/// Boxed so the store can be shared as `Arc<dyn TokenStore>`.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The two keys a token store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    Access,
    Refresh,
}

impl TokenKey {
    /// Storage key name, shared with the web client's local storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::Access => "access_token",
            TokenKey::Refresh => "refresh_token",
        }
    }
}

/// Access/refresh token pair.
///
/// The access token is short-lived and sent on every request. The refresh
/// token is used only to mint new access tokens.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
}

/// What a token store currently holds.
#[derive(Debug)]
pub enum CredentialState {
    Present(Credentials),
    /// Only one of the two tokens is stored
    Partial,
    Absent,
}

impl CredentialState {
    pub fn into_credentials(self) -> Option<Credentials> {
        match self {
            CredentialState::Present(credentials) => Some(credentials),
            CredentialState::Partial | CredentialState::Absent => None,
        }
    }
}

/// Durable key/value storage for the two tokens.
///
/// Shared by every in-flight request; implementations serialize their own
/// writes.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: TokenKey) -> StoreFuture<'_, Option<Secret<String>>>;

    fn set(&self, key: TokenKey, value: Secret<String>) -> StoreFuture<'_, Result<()>>;

    fn remove(&self, key: TokenKey) -> StoreFuture<'_, Result<()>>;
}

/// Read both tokens and classify the result.
pub async fn load_credentials(store: &dyn TokenStore) -> CredentialState {
    let access = store.get(TokenKey::Access).await;
    let refresh = store.get(TokenKey::Refresh).await;
    match (access, refresh) {
        (Some(access_token), Some(refresh_token)) => CredentialState::Present(Credentials {
            access_token,
            refresh_token,
        }),
        (None, None) => CredentialState::Absent,
        _ => CredentialState::Partial,
    }
}

/// Store both tokens, as after a login.
pub async fn save_credentials(store: &dyn TokenStore, credentials: Credentials) -> Result<()> {
    store.set(TokenKey::Access, credentials.access_token).await?;
    store.set(TokenKey::Refresh, credentials.refresh_token).await?;
    debug!("credentials saved");
    Ok(())
}

/// Remove both tokens.
///
/// Attempts both removals even if the first fails, then reports the first
/// error.
pub async fn clear_credentials(store: &dyn TokenStore) -> Result<()> {
    let access = store.remove(TokenKey::Access).await;
    let refresh = store.remove(TokenKey::Refresh).await;
    debug!("credentials cleared");
    access.and(refresh)
}

/// In-process token store.
///
/// Nothing survives a restart; used by tests and short-lived tools.
#[derive(Default)]
pub struct MemoryTokenStore {
    state: Mutex<HashMap<TokenKey, Secret<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a credential pair.
    pub fn with_credentials(access: &str, refresh: &str) -> Self {
        let mut state = HashMap::new();
        state.insert(TokenKey::Access, Secret::from(access));
        state.insert(TokenKey::Refresh, Secret::from(refresh));
        Self {
            state: Mutex::new(state),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: TokenKey) -> StoreFuture<'_, Option<Secret<String>>> {
        Box::pin(async move { self.state.lock().await.get(&key).cloned() })
    }

    fn set(&self, key: TokenKey, value: Secret<String>) -> StoreFuture<'_, Result<()>> {
        Box::pin(async move {
            self.state.lock().await.insert(key, value);
            Ok(())
        })
    }

    fn remove(&self, key: TokenKey) -> StoreFuture<'_, Result<()>> {
        Box::pin(async move {
            self.state.lock().await.remove(&key);
            Ok(())
        })
    }
}
