use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{Nutritionist, NutritionistPayload};

/// Nutritionist directory: admin CRUD plus the public listing the booking
/// page starts from.
pub struct DirectoryService {
    api: Arc<ApiClient>,
}

impl DirectoryService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Nutritionist>, ApiError> {
        self.api.get("/nutritionists/").await
    }

    pub async fn get(&self, id: i64) -> Result<Nutritionist, ApiError> {
        self.api.get(&format!("/nutritionists/{id}/")).await
    }

    pub async fn create(&self, payload: &NutritionistPayload) -> Result<Nutritionist, ApiError> {
        debug!("Creating nutritionist {} {}", payload.nombre, payload.apellido);
        self.api.post("/nutritionists/", payload).await
    }

    pub async fn update(
        &self,
        id: i64,
        payload: &NutritionistPayload,
    ) -> Result<Nutritionist, ApiError> {
        self.api.put(&format!("/nutritionists/{id}/"), payload).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/nutritionists/{id}/")).await
    }

    /// Partial update of the caller's own professional profile.
    pub async fn update_own_profile(&self, fields: Value) -> Result<Value, ApiError> {
        self.api.patch("/api/user/nutricionistas/me/", &fields).await
    }

    /// Public, unauthenticated directory for the landing/booking entry.
    pub async fn public_list(&self) -> Result<Vec<Nutritionist>, ApiError> {
        self.api.get("/api/public/nutricionistas/").await
    }

    pub async fn public_get(&self, id: i64) -> Result<Nutritionist, ApiError> {
        self.api.get(&format!("/api/public/nutricionistas/{id}/")).await
    }
}
