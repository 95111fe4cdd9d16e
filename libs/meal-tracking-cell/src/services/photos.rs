use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::{debug, info};

use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{MealPhoto, MealPhotoReview, MealPhotoUpload, ReviewFilter};

/// Patient-uploaded meal photos and the nutritionist's review loop.
pub struct MealPhotoService {
    api: Arc<ApiClient>,
}

impl MealPhotoService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Photos of one patient, optionally narrowed to pending/reviewed.
    pub async fn list(
        &self,
        patient_id: i64,
        filter: ReviewFilter,
    ) -> Result<Vec<MealPhoto>, ApiError> {
        let path = format!(
            "/meal-photos/?patient_id={patient_id}{}",
            filter.query_suffix()
        );
        debug!("Listing meal photos via {}", path);
        self.api.get(&path).await
    }

    /// The caller's own photos (patient view).
    pub async fn my_photos(&self) -> Result<Vec<MealPhoto>, ApiError> {
        self.api.get("/meal-photos/").await
    }

    pub async fn upload(&self, upload: &MealPhotoUpload) -> Result<MealPhoto, ApiError> {
        info!(
            "Uploading {} photo for {}",
            upload.meal_type, upload.meal_date
        );
        let photo = self
            .api
            .request_multipart(Method::POST, "/meal-photos/", || {
                let mut form = Form::new()
                    .text("meal_type", upload.meal_type.wire_value())
                    .text("meal_date", upload.meal_date.to_string());
                if let Some(time) = upload.meal_time {
                    form = form.text("meal_time", time.format("%H:%M").to_string());
                }
                if let Some(description) = &upload.description {
                    form = form.text("description", description.clone());
                }
                if let Some(notes) = &upload.notes {
                    form = form.text("notes", notes.clone());
                }
                form.part(
                    "photo",
                    Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone()),
                )
            })
            .await?;
        Ok(photo)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/meal-photos/{id}/")).await
    }

    /// Store the nutritionist's comment and calorie estimate.
    pub async fn review(&self, id: i64, review: &MealPhotoReview) -> Result<MealPhoto, ApiError> {
        self.api
            .put(&format!("/meal-photos/{id}/review/"), review)
            .await
    }
}
