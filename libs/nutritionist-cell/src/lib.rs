pub mod models;
pub mod services;

pub use services::directory::DirectoryService;
pub use services::schedule::ScheduleService;
