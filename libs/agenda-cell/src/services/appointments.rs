use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use shared_http::ApiClient;
use shared_models::error::ApiError;

/// One offered wall-clock time for the simple booking path. Times the
/// server marks unavailable are rendered but not selectable.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TimeSlotOption {
    pub time: String,
    #[serde(default)]
    pub is_available: bool,
}

#[derive(Debug, Deserialize)]
struct AvailableTimesResponse {
    #[serde(default)]
    time_slots: Vec<TimeSlotOption>,
}

/// Payload for the quick follow-up booking.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentRequest {
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub consultation_type: String,
    pub notes: String,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    #[serde(default)]
    pub consultation_type: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Quick booking against the patient's own assigned nutritionist: no
/// provider/location choice, just a day and a time.
pub struct AppointmentsService {
    api: Arc<ApiClient>,
}

impl AppointmentsService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Offered times for one day; a time is only selectable if the server
    /// marked it available.
    pub async fn available_times(&self, date: NaiveDate) -> Result<Vec<TimeSlotOption>, ApiError> {
        debug!("Fetching available times for {}", date);
        let response: AvailableTimesResponse = self
            .api
            .get(&format!("/appointments/available-times/?date={date}"))
            .await?;
        Ok(response.time_slots)
    }

    pub async fn create(&self, request: &AppointmentRequest) -> Result<Appointment, ApiError> {
        self.api.post("/appointments/", request).await
    }
}
