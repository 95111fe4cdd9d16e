use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{Patient, PatientPayload};

/// Patient CRUD for nutritionists and admins, plus the patient's own
/// profile update.
pub struct PatientService {
    api: Arc<ApiClient>,
}

impl PatientService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Patient>, ApiError> {
        self.api.get("/patients/").await
    }

    pub async fn get(&self, id: i64) -> Result<Patient, ApiError> {
        self.api.get(&format!("/patients/{id}/")).await
    }

    pub async fn create(&self, payload: &PatientPayload) -> Result<Patient, ApiError> {
        debug!("Creating patient {}", payload.dni);
        self.api.post("/patients/", payload).await
    }

    pub async fn update(&self, id: i64, payload: &PatientPayload) -> Result<Patient, ApiError> {
        self.api.put(&format!("/patients/{id}/"), payload).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/patients/{id}/")).await
    }

    /// Partial update of the caller's own patient profile.
    pub async fn update_own_profile(&self, fields: Value) -> Result<Value, ApiError> {
        self.api.patch("/api/user/pacientes/me/", &fields).await
    }
}
