pub mod calendar;
pub mod models;
pub mod services;
pub mod wizard;

pub use calendar::MonthGrid;
pub use services::appointments::AppointmentsService;
pub use services::provider::{AgendaProvider, PatientAgenda, PublicAgenda};
pub use services::turnos::TurnoService;
pub use wizard::{BookingWizard, SlotQuery, WizardStep};
