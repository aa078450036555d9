//! File-backed token store
//!
//! Keeps the two tokens in a small JSON object keyed by `access_token` and
//! `refresh_token`, so a session survives process restarts. All writes use
//! atomic temp-file + rename to prevent corruption on crash, and a tokio
//! Mutex serializes concurrent writes from refresh and logout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use common::Secret;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::credentials::{StoreFuture, TokenKey, TokenStore};
use crate::error::{Error, Result};

/// Token store persisted to a JSON file.
pub struct FileTokenStore {
    path: PathBuf,
    state: Mutex<HashMap<String, String>>,
}

impl FileTokenStore {
    /// Load tokens from the given file path.
    ///
    /// If the file doesn't exist, creates it as `{}` (logged out). Missing
    /// parent directories are created.
    pub async fn load(path: PathBuf) -> Result<Self> {
        let state = if path.exists() {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| Error::Io(format!("reading token file: {e}")))?;
            let tokens: HashMap<String, String> = serde_json::from_str(&contents)
                .map_err(|e| Error::CredentialParse(format!("parsing token file: {e}")))?;
            debug!(path = %path.display(), keys = tokens.len(), "loaded token file");
            tokens
        } else {
            info!(path = %path.display(), "token file not found, starting logged out");
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| Error::Io(format!("creating token directory: {e}")))?;
            }
            let tokens = HashMap::new();
            write_atomic(&path, &tokens).await?;
            tokens
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: TokenKey) -> StoreFuture<'_, Option<Secret<String>>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            state
                .get(key.as_str())
                .filter(|value| !value.is_empty())
                .map(|value| Secret::new(value.clone()))
        })
    }

    fn set(&self, key: TokenKey, value: Secret<String>) -> StoreFuture<'_, Result<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            let mut updated = state.clone();
            updated.insert(key.as_str().to_owned(), value.expose().clone());
            write_atomic(&self.path, &updated).await?;
            *state = updated;
            debug!(key = key.as_str(), "stored token");
            Ok(())
        })
    }

    fn remove(&self, key: TokenKey) -> StoreFuture<'_, Result<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            if !state.contains_key(key.as_str()) {
                return Ok(());
            }
            let mut updated = state.clone();
            updated.remove(key.as_str());
            write_atomic(&self.path, &updated).await?;
            *state = updated;
            debug!(key = key.as_str(), "removed token");
            Ok(())
        })
    }
}

/// Write tokens to a file atomically.
///
/// Writes to a temporary file in the same directory, then renames it over
/// the target. Sets file permissions to 0600 since the file holds bearer
/// tokens.
async fn write_atomic(path: &Path, data: &HashMap<String, String>) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| Error::CredentialParse(format!("serializing tokens: {e}")))?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let tmp_path = dir.join(format!(".tokens.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| Error::Io(format!("writing temp token file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| Error::Io(format!("setting token file permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::Io(format!("renaming temp token file: {e}")))?;

    debug!(path = %path.display(), "persisted tokens");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialState, load_credentials};

    #[tokio::test]
    async fn tokens_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileTokenStore::load(path.clone()).await.unwrap();
        store
            .set(TokenKey::Access, Secret::from("at_1"))
            .await
            .unwrap();
        store
            .set(TokenKey::Refresh, Secret::from("rt_1"))
            .await
            .unwrap();

        let reloaded = FileTokenStore::load(path).await.unwrap();
        let credentials = load_credentials(&reloaded)
            .await
            .into_credentials()
            .unwrap();
        assert_eq!(credentials.access_token.expose(), "at_1");
        assert_eq!(credentials.refresh_token.expose(), "rt_1");
    }

    #[tokio::test]
    async fn cold_start_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tokens.json");

        assert!(!path.exists());
        let store = FileTokenStore::load(path.clone()).await.unwrap();
        assert!(path.exists());
        assert!(matches!(
            load_credentials(&store).await,
            CredentialState::Absent
        ));

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: HashMap<String, String> = serde_json::from_str(&contents).unwrap();
        assert!(parsed.is_empty());
    }

    #[tokio::test]
    async fn file_uses_local_storage_key_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileTokenStore::load(path.clone()).await.unwrap();
        store
            .set(TokenKey::Refresh, Secret::from("valid-xyz"))
            .await
            .unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: HashMap<String, String> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["refresh_token"], "valid-xyz");
        assert!(!parsed.contains_key("access_token"));
    }

    #[tokio::test]
    async fn remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileTokenStore::load(path.clone()).await.unwrap();
        store
            .set(TokenKey::Access, Secret::from("at"))
            .await
            .unwrap();
        store.remove(TokenKey::Access).await.unwrap();
        store.remove(TokenKey::Access).await.unwrap();

        let reloaded = FileTokenStore::load(path).await.unwrap();
        assert!(reloaded.get(TokenKey::Access).await.is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let result = FileTokenStore::load(path).await;
        assert!(matches!(result, Err(Error::CredentialParse(_))));
    }

    #[tokio::test]
    async fn empty_value_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        tokio::fs::write(&path, r#"{"access_token":"","refresh_token":"rt"}"#)
            .await
            .unwrap();

        let store = FileTokenStore::load(path).await.unwrap();
        assert!(matches!(
            load_credentials(&store).await,
            CredentialState::Partial
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn file_permissions_are_0600() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileTokenStore::load(path.clone()).await.unwrap();
        store
            .set(TokenKey::Access, Secret::from("at"))
            .await
            .unwrap();

        let metadata = tokio::fs::metadata(&path).await.unwrap();
        let mode = metadata.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "token file must be 0600, got {mode:o}");
    }

    #[tokio::test]
    async fn concurrent_writes_dont_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let store = std::sync::Arc::new(FileTokenStore::load(path.clone()).await.unwrap());

        let mut handles = vec![];
        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let key = if i % 2 == 0 {
                    TokenKey::Access
                } else {
                    TokenKey::Refresh
                };
                store.set(key, Secret::new(format!("t_{i}"))).await.unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: HashMap<String, String> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[tokio::test]
    async fn failed_write_leaves_stored_tokens_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let token_dir = dir.path().join("session");
        let store = FileTokenStore::load(token_dir.join("tokens.json"))
            .await
            .unwrap();
        store
            .set(TokenKey::Access, Secret::from("at_before"))
            .await
            .unwrap();
        store
            .set(TokenKey::Refresh, Secret::from("rt_before"))
            .await
            .unwrap();

        std::fs::remove_dir_all(&token_dir).unwrap();

        let err = store
            .set(TokenKey::Access, Secret::from("at_after"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)), "got: {err:?}");
        assert!(store.remove(TokenKey::Refresh).await.is_err());

        assert_eq!(
            store.get(TokenKey::Access).await.unwrap().expose(),
            "at_before"
        );
        assert_eq!(
            store.get(TokenKey::Refresh).await.unwrap().expose(),
            "rt_before"
        );
    }
}
