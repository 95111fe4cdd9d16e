use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub dni: String,
    pub nombre: String,
    pub apellido: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub fecha_nacimiento: Option<NaiveDate>,
    #[serde(default)]
    pub genero: Option<String>,
    #[serde(default)]
    pub foto_perfil: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

/// Create/update payload for the patient CRUD endpoints.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PatientPayload {
    pub dni: String,
    pub nombre: String,
    pub apellido: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genero: Option<String>,
}

// ==============================================================================
// CLINICAL INTAKE
// ==============================================================================

/// Sections of the clinical-intake questionnaire, in capture order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeSection {
    BuscarPaciente,
    HistoriaClinica,
    HabitosAlimenticios,
    IndicadoresDietarios,
    DatosCalculadora,
    Resumen,
}

impl IntakeSection {
    pub const ALL: [IntakeSection; 6] = [
        IntakeSection::BuscarPaciente,
        IntakeSection::HistoriaClinica,
        IntakeSection::HabitosAlimenticios,
        IntakeSection::IndicadoresDietarios,
        IntakeSection::DatosCalculadora,
        IntakeSection::Resumen,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IntakeSection::BuscarPaciente => "Buscar Paciente",
            IntakeSection::HistoriaClinica => "Historia Clínica",
            IntakeSection::HabitosAlimenticios => "Hábitos Alimenticios",
            IntakeSection::IndicadoresDietarios => "Indicadores Dietarios",
            IntakeSection::DatosCalculadora => "Datos Calculadora",
            IntakeSection::Resumen => "Resumen",
        }
    }
}

/// The questionnaire accumulated section by section. Section content is
/// free-form key/value data; the server owns the field catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IntakeForm {
    pub paciente_ref: Map<String, Value>,
    pub historia_clinica: Map<String, Value>,
    pub habitos_alimenticios: Map<String, Value>,
    pub indicadores_dietarios: Map<String, Value>,
    pub datos_para_calculadora: Map<String, Value>,
}

impl IntakeForm {
    pub fn for_patient(patient: &Patient) -> Self {
        let mut paciente_ref = Map::new();
        paciente_ref.insert("id_paciente".to_string(), Value::from(patient.id));
        paciente_ref.insert("dni".to_string(), Value::from(patient.dni.clone()));
        paciente_ref.insert("nombre".to_string(), Value::from(patient.nombre.clone()));
        paciente_ref.insert("apellido".to_string(), Value::from(patient.apellido.clone()));
        Self {
            paciente_ref,
            ..Self::default()
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum IntakeError {
    #[error("Section {0} must be completed first")]
    SectionOutOfOrder(&'static str),
}

/// Section-order tracker for the multi-step capture. A section's data is
/// only accepted once all earlier sections are filled.
#[derive(Debug)]
pub struct IntakeProgress {
    current: usize,
}

impl Default for IntakeProgress {
    fn default() -> Self {
        Self { current: 0 }
    }
}

impl IntakeProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> IntakeSection {
        IntakeSection::ALL[self.current]
    }

    /// Advance past `section`; rejects skipping ahead.
    pub fn complete(&mut self, section: IntakeSection) -> Result<(), IntakeError> {
        if section != self.current() {
            return Err(IntakeError::SectionOutOfOrder(self.current().label()));
        }
        if self.current + 1 < IntakeSection::ALL.len() {
            self.current += 1;
        }
        Ok(())
    }

    pub fn is_at_summary(&self) -> bool {
        self.current() == IntakeSection::Resumen
    }
}
