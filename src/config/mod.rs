pub mod env;
mod loader;

pub use env::{AppConfig, DirectoryConfig, OcrConfig};
pub use loader::load_config;
