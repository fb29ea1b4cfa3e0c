pub mod analyzer;
pub mod file_loader;
pub mod http_analyzer;
pub mod preview_store;
