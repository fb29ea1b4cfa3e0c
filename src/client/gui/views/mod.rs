pub mod logger;
pub mod score_panel;
pub mod upload_panel;
