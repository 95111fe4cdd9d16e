use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use agenda_cell::models::{ConsultationType, Location};
use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{
    Bloqueo, BloqueoPayload, Disponibilidad, DisponibilidadPayload, ProfessionalSettings,
};

/// The nutritionist's own agenda configuration: locations, consultation
/// types, recurring availability windows, blocked intervals and the
/// booking-policy settings. Everything here feeds the slot computation the
/// server performs.
pub struct ScheduleService {
    api: Arc<ApiClient>,
}

impl ScheduleService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    // --- Locations ---

    pub async fn locations(&self) -> Result<Vec<Location>, ApiError> {
        self.api.get("/api/agenda/ubicaciones/").await
    }

    pub async fn add_location(&self, fields: Value) -> Result<Location, ApiError> {
        self.api.post("/api/agenda/ubicaciones/", &fields).await
    }

    pub async fn update_location(&self, id: i64, fields: Value) -> Result<Location, ApiError> {
        self.api
            .patch(&format!("/api/agenda/ubicaciones/{id}/"), &fields)
            .await
    }

    pub async fn delete_location(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/api/agenda/ubicaciones/{id}/")).await
    }

    // --- Consultation types ---

    pub async fn consultation_types(&self) -> Result<Vec<ConsultationType>, ApiError> {
        self.api.get("/api/agenda/tipos-consulta/").await
    }

    pub async fn add_consultation_type(&self, fields: Value) -> Result<ConsultationType, ApiError> {
        self.api.post("/api/agenda/tipos-consulta/", &fields).await
    }

    pub async fn update_consultation_type(
        &self,
        id: i64,
        fields: Value,
    ) -> Result<ConsultationType, ApiError> {
        self.api
            .patch(&format!("/api/agenda/tipos-consulta/{id}/"), &fields)
            .await
    }

    pub async fn delete_consultation_type(&self, id: i64) -> Result<(), ApiError> {
        self.api
            .delete(&format!("/api/agenda/tipos-consulta/{id}/"))
            .await
    }

    // --- Weekly availability ---

    pub async fn disponibilidades(&self) -> Result<Vec<Disponibilidad>, ApiError> {
        self.api.get("/api/agenda/disponibilidades/").await
    }

    pub async fn add_disponibilidad(
        &self,
        payload: &DisponibilidadPayload,
    ) -> Result<Disponibilidad, ApiError> {
        debug!(
            "Adding availability window day {} {}-{}",
            payload.dia_semana, payload.hora_inicio, payload.hora_fin
        );
        self.api.post("/api/agenda/disponibilidades/", payload).await
    }

    pub async fn update_disponibilidad(
        &self,
        id: i64,
        fields: Value,
    ) -> Result<Disponibilidad, ApiError> {
        self.api
            .patch(&format!("/api/agenda/disponibilidades/{id}/"), &fields)
            .await
    }

    pub async fn delete_disponibilidad(&self, id: i64) -> Result<(), ApiError> {
        self.api
            .delete(&format!("/api/agenda/disponibilidades/{id}/"))
            .await
    }

    // --- Blocked intervals ---

    pub async fn bloqueos(&self) -> Result<Vec<Bloqueo>, ApiError> {
        self.api.get("/api/agenda/bloqueos/").await
    }

    pub async fn add_bloqueo(&self, payload: &BloqueoPayload) -> Result<Bloqueo, ApiError> {
        self.api.post("/api/agenda/bloqueos/", payload).await
    }

    pub async fn update_bloqueo(&self, id: i64, fields: Value) -> Result<Bloqueo, ApiError> {
        self.api
            .patch(&format!("/api/agenda/bloqueos/{id}/"), &fields)
            .await
    }

    pub async fn delete_bloqueo(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/api/agenda/bloqueos/{id}/")).await
    }

    // --- Booking policy ---

    pub async fn settings(&self) -> Result<ProfessionalSettings, ApiError> {
        self.api.get("/api/agenda/professional-settings/").await
    }

    pub async fn update_settings(
        &self,
        id: i64,
        fields: Value,
    ) -> Result<ProfessionalSettings, ApiError> {
        self.api
            .patch(&format!("/api/agenda/professional-settings/{id}/"), &fields)
            .await
    }
}
