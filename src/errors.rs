use thiserror::Error;

#[derive(Debug, Error)]
pub enum DevServerError {
    #[error("Invalid URI: {0}")]
    InvalidUri(String),
    #[error("HTTP Error: {0}")]
    Http(String),
    #[error("Upstream unreachable: {0}")]
    Upstream(String),
    #[error("Upstream request timed out")]
    Timeout,
    #[error("Failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl warp::reject::Reject for DevServerError {}
