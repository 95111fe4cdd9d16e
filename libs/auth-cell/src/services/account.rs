use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_http::ApiClient;
use shared_models::auth::{CurrentUser, LoginRequest, Role, TokenPair};
use shared_models::error::ApiError;

/// Login, logout and profile operations for the current user.
pub struct AccountService {
    api: Arc<ApiClient>,
}

impl AccountService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Exchange DNI + password for a token pair, install it in the session
    /// and return the authenticated user's profile.
    pub async fn login(&self, dni: &str, password: &str) -> Result<CurrentUser, ApiError> {
        debug!("Logging in user with DNI {}", dni);

        let request = LoginRequest {
            dni: dni.to_string(),
            password: password.to_string(),
        };
        let tokens: TokenPair = self.api.post("/auth/jwt/create/", &request).await?;

        if let Some(session) = self.api.session() {
            session.install(tokens).await;
        }

        let user = self.me().await?;
        info!("User {} logged in", user.id);
        Ok(user)
    }

    pub async fn me(&self) -> Result<CurrentUser, ApiError> {
        self.api.get("/auth/users/me/").await
    }

    /// Blacklist the refresh token server-side (best effort) and clear the
    /// local session.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Some(session) = self.api.session() {
            if let Some(refresh) = session.refresh_token().await {
                let result = self
                    .api
                    .post_unit("/auth/jwt/blacklist/", &json!({ "refresh": refresh }))
                    .await;
                if let Err(e) = result {
                    warn!("Refresh token blacklist failed, clearing locally: {}", e);
                }
            }
            session.clear().await;
        }
        Ok(())
    }

    pub async fn set_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        self.api
            .post_unit(
                "/auth/users/set_password/",
                &json!({
                    "current_password": current_password,
                    "new_password": new_password,
                }),
            )
            .await
    }

    /// Partial profile update. The endpoint depends on the caller's role:
    /// admins patch the account itself, patients and nutritionists patch
    /// their role profile.
    pub async fn update_profile(&self, role: Role, fields: Value) -> Result<Value, ApiError> {
        let path = match role {
            Role::Admin => "/auth/users/me/",
            Role::Paciente => "/api/user/pacientes/me/",
            Role::Nutricionista => "/api/user/nutricionistas/me/",
        };
        debug!("Updating profile via {}", path);
        self.api.patch(path, &fields).await
    }
}
