pub mod auth_status;
pub mod health;
pub mod proxy;
