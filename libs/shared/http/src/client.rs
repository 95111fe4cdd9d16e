use std::sync::Arc;

use reqwest::{multipart, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use shared_config::ApiConfig;
use shared_models::error::ApiError;

use crate::session::AuthSession;

/// HTTP wrapper every cell talks through.
///
/// Attaches the bearer token from the session when one is held, and on a
/// 401 from a non-auth endpoint performs the session's single-flight
/// refresh and retries the original request exactly once.
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Option<Arc<AuthSession>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<AuthSession>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            session: Some(session),
        }
    }

    /// Session-less variant for the public booking endpoints.
    pub fn public(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            session: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> Option<&Arc<AuthSession>> {
        self.session.as_ref()
    }

    // Token issuance endpoints must never trigger the refresh-retry loop.
    fn is_auth_endpoint(path: &str) -> bool {
        path.starts_with("/auth/jwt/create") || path.starts_with("/auth/jwt/refresh")
    }

    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send_with_retry(method, path, body).await?;
        Self::decode(response).await
    }

    /// Same as [`ApiClient::request`] for endpoints that answer with an
    /// empty body (DELETE, 204).
    pub async fn request_unit<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.send_with_retry(method, path, body).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, body);
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(())
    }

    /// Multipart upload with the same auth/retry semantics. The form is not
    /// reusable after a send, so the caller provides a builder.
    pub async fn request_multipart<T, F>(
        &self,
        method: Method,
        path: &str,
        make_form: F,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> multipart::Form,
    {
        let url = format!("{}{}", self.base_url, path);
        let token = self.current_token().await;

        let response = self
            .execute_multipart(method.clone(), &url, make_form(), token.as_deref())
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED && !Self::is_auth_endpoint(path) {
            if let (Some(session), Some(stale)) = (&self.session, token) {
                let fresh = session.refresh(&stale).await?;
                let retried = self
                    .execute_multipart(method, &url, make_form(), Some(&fresh))
                    .await?;
                return Self::decode(retried).await;
            }
        }

        Self::decode(response).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.request_unit(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, path, None::<&()>).await
    }

    async fn current_token(&self) -> Option<String> {
        match &self.session {
            Some(session) => session.access_token().await,
            None => None,
        }
    }

    async fn send_with_retry<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let token = self.current_token().await;
        debug!("Making request to {}", url);

        let response = self
            .execute(method.clone(), &url, body, token.as_deref())
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED && !Self::is_auth_endpoint(path) {
            if let (Some(session), Some(stale)) = (&self.session, token) {
                let fresh = session.refresh(&stale).await?;
                debug!("Retrying {} with refreshed token", url);
                return Ok(self.execute(method, &url, body, Some(&fresh)).await?);
            }
        }

        Ok(response)
    }

    async fn execute<B>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, reqwest::Error>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await
    }

    async fn execute_multipart(
        &self,
        method: Method,
        url: &str,
        form: multipart::Form,
        token: Option<&str>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self.client.request(method, url).multipart(form);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, body);
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        Ok(response.json::<T>().await?)
    }
}
