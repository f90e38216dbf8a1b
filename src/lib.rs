pub mod browser;
pub mod config;
pub mod env;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;

pub use config::{DevServerConfig, ServerConfig, DEV_CONFIG};
pub use env::ImportMetaEnv;
pub use errors::DevServerError;
pub use models::{AppState, PathRewrite, ProxyRule};
