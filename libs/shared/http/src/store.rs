use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

use shared_models::auth::TokenPair;

/// Durable home for the access/refresh pair, the only client state that
/// outlives a request (the local-storage analog).
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<TokenPair>;
    fn save(&self, tokens: &TokenPair);
    fn clear(&self);
}

/// Process-local store. Default for library use and tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<TokenPair> {
        self.tokens.read().ok().and_then(|guard| guard.clone())
    }

    fn save(&self, tokens: &TokenPair) {
        if let Ok(mut guard) = self.tokens.write() {
            *guard = Some(tokens.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.tokens.write() {
            *guard = None;
        }
    }
}

/// JSON file holding the two token strings. Store failures are logged and
/// swallowed; losing persistence only costs a re-login.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<TokenPair> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                warn!("Ignoring malformed token file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, tokens: &TokenPair) {
        let serialized = match serde_json::to_string(tokens) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize tokens: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, serialized) {
            warn!("Failed to persist tokens to {}: {}", self.path.display(), e);
        }
    }

    fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!("Failed to remove token file {}: {}", self.path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            access: "acc-1".to_string(),
            refresh: "ref-1".to_string(),
        }
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().is_none());

        store.save(&pair());
        assert_eq!(store.load(), Some(pair()));

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));

        assert!(store.load().is_none());
        store.save(&pair());
        assert_eq!(store.load(), Some(pair()));

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn file_store_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(path);
        assert!(store.load().is_none());
    }
}
