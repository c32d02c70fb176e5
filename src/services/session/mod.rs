pub mod store;
pub mod valkey;

pub use store::{SessionError, SessionStore};
pub use valkey::ValkeySessionStore;
