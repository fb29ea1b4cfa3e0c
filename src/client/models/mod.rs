pub mod app_state;
pub mod health;
pub mod messages;
pub mod upload;
