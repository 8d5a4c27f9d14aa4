pub mod commands;
pub mod config;
pub mod handlers;
pub mod server;

// Re-export commonly used entry points for convenience
pub use config::{AppConfig, ConfigOverrides};
pub use handlers::{config_overrides, search_query};
pub use server::build_router;
