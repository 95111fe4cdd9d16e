use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{IntakeForm, Patient};

#[derive(Debug, Deserialize)]
struct BuscarPacienteResponse {
    paciente: Patient,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureReceipt {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Clinical-history and eating-habits capture flow.
pub struct IntakeService {
    api: Arc<ApiClient>,
}

impl IntakeService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Look a patient up by DNI to anchor the questionnaire.
    pub async fn find_patient(&self, dni: &str) -> Result<Patient, ApiError> {
        debug!("Searching patient by DNI {}", dni);
        let response: BuscarPacienteResponse = self
            .api
            .get(&format!("/formulario/buscar-paciente/?dni={dni}"))
            .await?;
        Ok(response.paciente)
    }

    /// Previously captured form for a patient, if any.
    pub async fn existing_form(&self, patient_id: i64) -> Result<IntakeForm, ApiError> {
        self.api
            .get(&format!("/formulario/paciente/{patient_id}/"))
            .await
    }

    pub async fn submit(&self, form: &IntakeForm) -> Result<CaptureReceipt, ApiError> {
        let receipt: CaptureReceipt = self.api.post("/formulario/captura/", form).await?;
        info!("Intake form captured for patient {:?}", form.paciente_ref.get("id_paciente"));
        Ok(receipt)
    }
}
