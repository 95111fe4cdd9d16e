use std::sync::Arc;

use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};

use shared_config::ApiConfig;
use shared_models::auth::{RefreshRequest, RefreshResponse, TokenPair};
use shared_models::error::ApiError;

/// Broadcast to interested parties whenever authentication state changes.
/// `Expired` is the redirect-to-login signal: the refresh flow gave up and
/// stored credentials were cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
    Expired,
}

/// Explicit authentication context shared by every [`crate::ApiClient`].
///
/// Owns the token pair, mirrors it to the [`crate::TokenStore`], and
/// serializes refresh attempts so that concurrent 401s produce exactly one
/// `POST /auth/jwt/refresh/` per expiry window.
pub struct AuthSession {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn crate::TokenStore>,
    tokens: RwLock<Option<TokenPair>>,
    refresh_gate: Mutex<()>,
    status_tx: watch::Sender<SessionStatus>,
}

impl AuthSession {
    pub fn new(config: &ApiConfig, store: Arc<dyn crate::TokenStore>) -> Self {
        let initial = store.load();
        let status = if initial.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        };
        let (status_tx, _) = watch::channel(status);

        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            store,
            tokens: RwLock::new(initial),
            refresh_gate: Mutex::new(()),
            status_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.access.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.refresh.clone())
    }

    /// Install a freshly issued pair (after login).
    pub async fn install(&self, tokens: TokenPair) {
        self.store.save(&tokens);
        *self.tokens.write().await = Some(tokens);
        let _ = self.status_tx.send(SessionStatus::Authenticated);
        info!("Session tokens installed");
    }

    /// Forget credentials (logout).
    pub async fn clear(&self) {
        self.store.clear();
        *self.tokens.write().await = None;
        let _ = self.status_tx.send(SessionStatus::Anonymous);
        info!("Session tokens cleared");
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Single-flight: callers racing on concurrent 401s queue on the gate,
    /// and any caller whose `stale_access` was already replaced while it
    /// waited gets the fresh token without a second network call. On
    /// failure the session is expired and the original error is returned.
    pub async fn refresh(&self, stale_access: &str) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.access_token().await {
            if current != stale_access {
                debug!("Refresh already performed by a concurrent request");
                return Ok(current);
            }
        }

        let refresh = match self.refresh_token().await {
            Some(token) => token,
            None => {
                self.expire().await;
                return Err(ApiError::Auth("No refresh token available".to_string()));
            }
        };

        debug!("Refreshing access token");
        let url = format!("{}/auth/jwt/refresh/", self.base_url);
        let response = match self
            .http
            .post(&url)
            .json(&RefreshRequest { refresh })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.expire().await;
                return Err(ApiError::Network(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Token refresh rejected ({}): {}", status, body);
            self.expire().await;
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        let refreshed: RefreshResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                self.expire().await;
                return Err(ApiError::Network(e));
            }
        };

        {
            let mut guard = self.tokens.write().await;
            if let Some(tokens) = guard.as_mut() {
                tokens.access = refreshed.access.clone();
                self.store.save(tokens);
            }
        }
        info!("Access token refreshed");

        Ok(refreshed.access)
    }

    async fn expire(&self) {
        self.store.clear();
        *self.tokens.write().await = None;
        let _ = self.status_tx.send(SessionStatus::Expired);
        warn!("Session expired, credentials cleared");
    }
}
