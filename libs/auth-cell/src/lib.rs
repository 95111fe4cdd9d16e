pub mod services;

pub use services::account::AccountService;
