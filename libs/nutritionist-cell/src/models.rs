use chrono::{DateTime, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nutritionist {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    #[serde(default)]
    pub matricula: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub especialidades: Vec<String>,
    #[serde(default)]
    pub foto_perfil: Option<String>,
}

impl Nutritionist {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

/// Create/update payload for the admin directory endpoints.
#[derive(Debug, Clone, Serialize, Default)]
pub struct NutritionistPayload {
    pub nombre: String,
    pub apellido: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matricula: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
}

// ==============================================================================
// AGENDA CONFIGURATION (nutritionist-owned)
// ==============================================================================

/// One weekly recurring availability window. `dia_semana` is 0 (Monday)
/// through 6 (Sunday), as the server counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disponibilidad {
    pub id: i64,
    #[serde(default)]
    pub ubicacion: Option<i64>,
    pub dia_semana: u8,
    pub hora_inicio: NaiveTime,
    pub hora_fin: NaiveTime,
    #[serde(default)]
    pub slot_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisponibilidadPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ubicacion: Option<i64>,
    pub dia_semana: u8,
    pub hora_inicio: NaiveTime,
    pub hora_fin: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_minutes: Option<i64>,
}

/// A blocked interval (vacation, congress, personal) that removes slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bloqueo {
    pub id: i64,
    #[serde(default)]
    pub ubicacion: Option<i64>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    #[serde(default)]
    pub motivo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BloqueoPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ubicacion: Option<i64>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivo: Option<String>,
}

/// Singleton booking-policy settings: lead-time bounds and the minimum
/// notice for patient-side cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessionalSettings {
    pub id: i64,
    #[serde(default)]
    pub anticipacion_minima_horas: Option<i64>,
    #[serde(default)]
    pub anticipacion_maxima_dias: Option<i64>,
    #[serde(default)]
    pub min_reschedule_hours: Option<i64>,
    #[serde(default)]
    pub booking_mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disponibilidad_parses_times() {
        let parsed: Disponibilidad = serde_json::from_str(
            r#"{"id": 1, "dia_semana": 0, "hora_inicio": "09:00:00",
                "hora_fin": "13:00:00", "slot_minutes": 30}"#,
        )
        .unwrap();
        assert_eq!(parsed.hora_inicio.to_string(), "09:00:00");
        assert_eq!(parsed.slot_minutes, Some(30));
    }

    #[test]
    fn nutritionist_full_name_joins_parts() {
        let n = Nutritionist {
            id: 5,
            nombre: "María".to_string(),
            apellido: "López".to_string(),
            matricula: Some("MN-1234".to_string()),
            email: None,
            telefono: None,
            especialidades: vec![],
            foto_perfil: None,
        };
        assert_eq!(n.full_name(), "María López");
    }
}
