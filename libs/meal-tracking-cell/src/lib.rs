pub mod models;
pub mod services;

pub use services::photos::MealPhotoService;
pub use services::plans::MealPlanService;
