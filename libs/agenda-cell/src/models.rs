use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==============================================================================
// REFERENCE DATA (fetched per nutritionist)
// ==============================================================================

/// A place where the nutritionist sees patients, physical or virtual.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
}

/// A bookable consultation kind with its duration and price.
///
/// `price` stays a string: the backend serializes decimals as text and the
/// client only ever displays it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsultationType {
    pub id: i64,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "tipo_display")]
    pub label: String,
    #[serde(rename = "duracion_min")]
    pub duration_minutes: i64,
    #[serde(rename = "precio")]
    pub price: String,
    #[serde(rename = "buffer_before_min", default)]
    pub buffer_before_minutes: i64,
    #[serde(rename = "buffer_after_min", default)]
    pub buffer_after_minutes: i64,
}

// ==============================================================================
// SLOTS
// ==============================================================================

/// A contiguous open interval reported by the server. Immutable, fetched
/// fresh per query and never cached across parameter changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    #[serde(rename = "inicio")]
    pub start: DateTime<FixedOffset>,
    #[serde(rename = "fin")]
    pub end: DateTime<FixedOffset>,
}

impl Slot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Local calendar date of the interval start.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Wall-clock start, e.g. "09:00".
    pub fn start_label(&self) -> String {
        self.start.format("%H:%M").to_string()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Parameters of one availability fetch. Scoped to a single day: the wizard
/// queries `[start_of_day, end_of_day]` for the chosen date.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotQueryParams {
    pub nutricionista_id: i64,
    pub ubicacion_id: i64,
    pub tipo_consulta_id: i64,
    pub duration_minutes: i64,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
}

// ==============================================================================
// TURNOS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TurnoState {
    Tentativo,
    Reservado,
    Confirmado,
    Cancelado,
}

impl fmt::Display for TurnoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnoState::Tentativo => write!(f, "TENTATIVO"),
            TurnoState::Reservado => write!(f, "RESERVADO"),
            TurnoState::Confirmado => write!(f, "CONFIRMADO"),
            TurnoState::Cancelado => write!(f, "CANCELADO"),
        }
    }
}

/// A booked appointment as listed by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct Turno {
    pub id: i64,
    pub nutricionista: i64,
    #[serde(default)]
    pub paciente: Option<i64>,
    #[serde(default)]
    pub ubicacion: Option<i64>,
    pub tipo_consulta: i64,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub state: TurnoState,
    #[serde(default)]
    pub notas_paciente: Option<String>,
    // Denormalized labels some listings include.
    #[serde(default)]
    pub paciente_nombre: Option<String>,
    #[serde(default)]
    pub ubicacion_nombre: Option<String>,
    #[serde(default)]
    pub tipo_consulta_display: Option<String>,
}

// ==============================================================================
// BOOKING REQUEST / RESPONSE
// ==============================================================================

/// Who the booking is for. Name and a contact email are required, phone is
/// optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl ContactInfo {
    /// Minimal structural check; the server remains the authority.
    pub fn is_valid(&self) -> bool {
        !self.full_name.trim().is_empty() && self.email.contains('@')
    }
}

/// Payload sent on submit. The server is the sole authority on whether the
/// slot is still free.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingRequest {
    pub nutricionista: i64,
    pub ubicacion: i64,
    pub tipo_consulta: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub duration_minutes: i64,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub nombre_completo: String,
    pub email: String,
    pub telefono: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notas_paciente: Option<String>,
}

/// Server acknowledgment of a created booking. Public bookings come back
/// TENTATIVO and must be confirmed from the emailed link within its window.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BookingConfirmation {
    pub id: i64,
    #[serde(default)]
    pub state: Option<TurnoState>,
    #[serde(default)]
    pub detail: Option<String>,
}

// ==============================================================================
// WIZARD ERRORS
// ==============================================================================

/// Client-side rejections of wizard input. Server-side rejections arrive as
/// `ApiError` through `complete_submit`.
#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("A {0} must be selected first")]
    OutOfOrder(&'static str),

    #[error("The date {0} is not selectable")]
    DateNotSelectable(NaiveDate),

    #[error("The slot is not part of the offered set")]
    SlotNotOffered,

    #[error("A name and a contact email are required")]
    MissingContact,

    #[error("A submission is already in flight")]
    AlreadySubmitting,
}
