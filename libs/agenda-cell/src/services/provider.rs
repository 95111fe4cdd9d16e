use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{
    BookingConfirmation, BookingRequest, ConsultationType, Location, Slot, SlotQueryParams,
};

/// Data-fetching capability the booking wizard is parameterized by.
/// The authenticated and public flows differ only in endpoints and auth,
/// never in wizard logic.
#[async_trait]
pub trait AgendaProvider: Send + Sync {
    async fn locations(&self, nutricionista_id: i64) -> Result<Vec<Location>, ApiError>;

    async fn consultation_types(
        &self,
        nutricionista_id: i64,
    ) -> Result<Vec<ConsultationType>, ApiError>;

    async fn available_slots(&self, params: &SlotQueryParams) -> Result<Vec<Slot>, ApiError>;

    async fn submit_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, ApiError>;
}

/// Authenticated agenda access for logged-in patients.
pub struct PatientAgenda {
    api: Arc<ApiClient>,
}

impl PatientAgenda {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AgendaProvider for PatientAgenda {
    async fn locations(&self, nutricionista_id: i64) -> Result<Vec<Location>, ApiError> {
        let path = format!("/api/agenda/nutricionista/{nutricionista_id}/ubicaciones/");
        self.api.get(&path).await
    }

    async fn consultation_types(
        &self,
        nutricionista_id: i64,
    ) -> Result<Vec<ConsultationType>, ApiError> {
        let path = format!("/api/agenda/nutricionista/{nutricionista_id}/tipos-consulta/");
        self.api.get(&path).await
    }

    async fn available_slots(&self, params: &SlotQueryParams) -> Result<Vec<Slot>, ApiError> {
        debug!(
            "Fetching slots for nutricionista {} on {}",
            params.nutricionista_id, params.fecha_inicio
        );
        let path = format!(
            "/api/agenda/nutricionista/{}/slots/?fecha_inicio={}&fecha_fin={}&duracion={}&ubicacion_id={}&tipo_consulta_id={}",
            params.nutricionista_id,
            params.fecha_inicio,
            params.fecha_fin,
            params.duration_minutes,
            params.ubicacion_id,
            params.tipo_consulta_id,
        );
        self.api.get(&path).await
    }

    async fn submit_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, ApiError> {
        self.api.post("/api/agenda/turnos/", request).await
    }
}

/// Unauthenticated agenda access for the public booking page.
pub struct PublicAgenda {
    api: Arc<ApiClient>,
}

impl PublicAgenda {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Confirm a tentative public booking with the token from the emailed
    /// link. The server enforces the confirmation window.
    pub async fn verify(&self, token: &str) -> Result<BookingConfirmation, ApiError> {
        self.api
            .post(
                "/api/public/agenda/turnos/verify/",
                &serde_json::json!({ "token": token }),
            )
            .await
    }
}

#[async_trait]
impl AgendaProvider for PublicAgenda {
    async fn locations(&self, nutricionista_id: i64) -> Result<Vec<Location>, ApiError> {
        let path = format!("/api/public/agenda/ubicaciones/?nutricionista={nutricionista_id}");
        self.api.get(&path).await
    }

    async fn consultation_types(
        &self,
        nutricionista_id: i64,
    ) -> Result<Vec<ConsultationType>, ApiError> {
        let path =
            format!("/api/public/agenda/tipos-consulta/?nutricionista={nutricionista_id}");
        self.api.get(&path).await
    }

    async fn available_slots(&self, params: &SlotQueryParams) -> Result<Vec<Slot>, ApiError> {
        debug!(
            "Fetching public slots for nutricionista {} on {}",
            params.nutricionista_id, params.fecha_inicio
        );
        let path = format!(
            "/api/public/agenda/slots/?nutricionista_id={}&ubicacion_id={}&tipo_consulta_id={}&start_date={}&end_date={}",
            params.nutricionista_id,
            params.ubicacion_id,
            params.tipo_consulta_id,
            params.fecha_inicio,
            params.fecha_fin,
        );
        self.api.get(&path).await
    }

    async fn submit_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, ApiError> {
        self.api.post("/api/public/agenda/turnos/", request).await
    }
}
