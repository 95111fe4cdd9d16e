use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::json;
use tracing::info;

use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{MealPlan, MealPlanUpload, PlanAssignment};

/// Meal-plan files and their assignment to patients.
pub struct MealPlanService {
    api: Arc<ApiClient>,
}

impl MealPlanService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<MealPlan>, ApiError> {
        self.api.get("/api/user/planes-alimentarios/").await
    }

    pub async fn upload(&self, upload: &MealPlanUpload) -> Result<MealPlan, ApiError> {
        info!("Uploading meal plan '{}'", upload.titulo);
        self.api
            .request_multipart(Method::POST, "/api/user/planes-alimentarios/", || {
                Form::new()
                    .text("titulo", upload.titulo.clone())
                    .text("descripcion", upload.descripcion.clone().unwrap_or_default())
                    .part(
                        "archivo",
                        Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone()),
                    )
            })
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api
            .delete(&format!("/api/user/planes-alimentarios/{id}/"))
            .await
    }

    // --- Assignments ---

    pub async fn assignments(&self) -> Result<Vec<PlanAssignment>, ApiError> {
        self.api.get("/api/user/asignaciones-planes/").await
    }

    pub async fn assign(&self, plan: i64, paciente: i64) -> Result<PlanAssignment, ApiError> {
        self.api
            .post(
                "/api/user/asignaciones-planes/",
                &json!({ "plan": plan, "paciente": paciente }),
            )
            .await
    }

    pub async fn unassign(&self, assignment_id: i64) -> Result<(), ApiError> {
        self.api
            .delete(&format!("/api/user/asignaciones-planes/{assignment_id}/"))
            .await
    }
}
