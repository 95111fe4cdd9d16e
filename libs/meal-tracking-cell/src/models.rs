use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    NightSnack,
    Other,
}

impl MealType {
    /// Label as shown to patients.
    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Desayuno",
            MealType::MorningSnack => "Colación Media Mañana",
            MealType::Lunch => "Almuerzo",
            MealType::AfternoonSnack => "Merienda",
            MealType::Dinner => "Cena",
            MealType::NightSnack => "Colación Nocturna",
            MealType::Other => "Otro",
        }
    }

    pub fn wire_value(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::MorningSnack => "morning_snack",
            MealType::Lunch => "lunch",
            MealType::AfternoonSnack => "afternoon_snack",
            MealType::Dinner => "dinner",
            MealType::NightSnack => "night_snack",
            MealType::Other => "other",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPhoto {
    pub id: i64,
    pub patient_id: i64,
    pub meal_type: MealType,
    pub meal_date: NaiveDate,
    #[serde(default)]
    pub meal_time: Option<NaiveTime>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub photo: String,
    #[serde(default)]
    pub reviewed: bool,
    #[serde(default)]
    pub nutritionist_comment: Option<String>,
    #[serde(default)]
    pub estimated_calories: Option<i32>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<FixedOffset>>,
}

/// Listing filter: everything, awaiting review, or already reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewFilter {
    #[default]
    All,
    Pending,
    Reviewed,
}

impl ReviewFilter {
    /// Query-string suffix the listing endpoint understands.
    pub fn query_suffix(&self) -> &'static str {
        match self {
            ReviewFilter::All => "",
            ReviewFilter::Pending => "&reviewed=false",
            ReviewFilter::Reviewed => "&reviewed=true",
        }
    }
}

/// Fields captured when uploading a photo; the image bytes travel as a
/// multipart part alongside.
#[derive(Debug, Clone)]
pub struct MealPhotoUpload {
    pub meal_type: MealType,
    pub meal_date: NaiveDate,
    pub meal_time: Option<NaiveTime>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Nutritionist's verdict on one photo.
#[derive(Debug, Clone, Serialize)]
pub struct MealPhotoReview {
    pub nutritionist_comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_calories: Option<i32>,
}

// ==============================================================================
// MEAL PLANS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: i64,
    pub titulo: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub archivo: String,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone)]
pub struct MealPlanUpload {
    pub titulo: String,
    pub descripcion: Option<String>,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Assignment of a plan file to a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanAssignment {
    pub id: i64,
    pub plan: i64,
    pub paciente: i64,
    #[serde(default)]
    pub assigned_at: Option<DateTime<FixedOffset>>,
}
