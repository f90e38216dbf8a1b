use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use lazy_static::lazy_static;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use crate::errors::DevServerError;
use crate::models::{PathRewrite, ProxyRule};


pub const DEV_SERVER_PORT: u16 = 5173;
pub const OPEN_BROWSER: bool = true;
pub const PROXY_CONTEXT: &str = "/api";
pub const PROXY_TARGET: &str = "https://spark-api-open.xf-yun.com";
pub const PROXY_REWRITE_TO: &str = "/v1/chat/completions";
pub const REQUEST_TIMEOUT_SECS: u64 = 120; // time allowed until upstream response headers
pub const DEFAULT_MODE: &str = "development";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Serialize)]
pub struct DevServerConfig {
    pub mode: String,
    pub root: PathBuf,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub strict_port: bool,
    pub open: bool,
    pub cors: bool,
    pub request_timeout_secs: u64,
    pub proxy: Vec<ProxyRule>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEV_SERVER_PORT,
            strict_port: false,
            open: OPEN_BROWSER,
            cors: true,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            proxy: vec![spark_proxy_rule()],
        }
    }
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE.to_string(),
            root: PathBuf::from("."),
            server: ServerConfig::default(),
        }
    }
}

/// `/api/*` -> `https://spark-api-open.xf-yun.com/v1/chat/completions/*`
pub fn spark_proxy_rule() -> ProxyRule {
    ProxyRule::new(PROXY_CONTEXT, PROXY_TARGET)
        .change_origin(true)
        .rewrite(PROXY_CONTEXT, PROXY_REWRITE_TO)
}

/// The Spark rewrite on its own: a leading `/api` becomes `/v1/chat/completions`.
pub fn rewrite(path: &str) -> String {
    PathRewrite::new(PROXY_CONTEXT, PROXY_REWRITE_TO).apply(path)
}

lazy_static! {
    pub static ref DEV_CONFIG: DevServerConfig = DevServerConfig::default();
}

pub fn init_tracing() -> Result<(), DevServerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(DEFAULT_LOG_FILTER)
            .map_err(|e| DevServerError::Config(e.to_string()))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| DevServerError::Config(e.to_string()))
}
