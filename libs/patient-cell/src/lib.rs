pub mod models;
pub mod services;

pub use services::intake::IntakeService;
pub use services::patient::PatientService;
