use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{Turno, TurnoState};

/// Management of booked turnos: listing for both roles, plus the
/// nutritionist-side approve/cancel actions. Domain rejections (lead-time
/// policy, overlap including buffers, blocked intervals) surface verbatim
/// as `ApiError::Domain`.
pub struct TurnoService {
    api: Arc<ApiClient>,
}

impl TurnoService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Turnos visible to the caller; the server scopes by role.
    pub async fn list(&self, state: Option<TurnoState>) -> Result<Vec<Turno>, ApiError> {
        let path = match state {
            Some(state) => format!("/api/agenda/turnos/?state={state}"),
            None => "/api/agenda/turnos/".to_string(),
        };
        self.api.get(&path).await
    }

    pub async fn get(&self, id: i64) -> Result<Turno, ApiError> {
        self.api.get(&format!("/api/agenda/turnos/{id}/")).await
    }

    /// Nutritionist's own turnos within a date range.
    pub async fn mis_turnos(
        &self,
        fecha_inicio: Option<NaiveDate>,
        fecha_fin: Option<NaiveDate>,
    ) -> Result<Vec<Turno>, ApiError> {
        let mut path = "/api/agenda/turnos/mis-turnos/".to_string();
        let mut separator = '?';
        if let Some(inicio) = fecha_inicio {
            path.push_str(&format!("{separator}fecha_inicio={inicio}"));
            separator = '&';
        }
        if let Some(fin) = fecha_fin {
            path.push_str(&format!("{separator}fecha_fin={fin}"));
        }
        debug!("Listing own turnos via {}", path);
        self.api.get(&path).await
    }

    /// Promote a tentative turno to confirmed. The server re-validates
    /// overlap at approval time and may reject with a conflict.
    pub async fn aprobar(&self, id: i64) -> Result<Turno, ApiError> {
        self.api
            .request(
                reqwest::Method::POST,
                &format!("/api/agenda/turnos/{id}/aprobar/"),
                None::<&()>,
            )
            .await
    }

    pub async fn cancelar(&self, id: i64) -> Result<Turno, ApiError> {
        self.api
            .request(
                reqwest::Method::POST,
                &format!("/api/agenda/turnos/{id}/cancelar/"),
                None::<&()>,
            )
            .await
    }
}
