// Export our modules for use in the binary and tests
pub mod client;
#[path = "config/config.rs"]
pub mod config;
pub mod logging;
pub mod upload;

pub use client::{ClientError, DetectClient};
pub use config::AppConfig;
