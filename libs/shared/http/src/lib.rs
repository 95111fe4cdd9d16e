pub mod client;
pub mod session;
pub mod store;

pub use client::ApiClient;
pub use session::{AuthSession, SessionStatus};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
