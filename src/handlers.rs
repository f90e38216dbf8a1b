use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use bytes::Bytes;
use hyper::{Body, HeaderMap, Method, Response, StatusCode};
use serde_json::json;
use tracing::{info, warn};
use warp::path::FullPath;
use warp::{Rejection, Reply};
use crate::errors::DevServerError;
use crate::middleware::preflight_headers;
use crate::models::{AppState, ProxyRule};
use crate::services::forward;

#[cfg(test)]
mod tests;

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(e) = err.find::<DevServerError>() {
        let code = match e {
            DevServerError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            DevServerError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (code, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
    } else {
        warn!(rejection = ?err, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "error": message })),
        code,
    ))
}

pub async fn proxy_request(
    rule: ProxyRule,
    method: Method,
    headers: HeaderMap,
    full_path: FullPath,
    query: String,
    body: Bytes,
    state: Arc<AppState>,
) -> Result<Response<Body>, Rejection> {
    let start_time = Instant::now();

    let mut path_and_query = full_path.as_str().to_string();
    if !query.is_empty() {
        path_and_query.push('?');
        path_and_query.push_str(&query);
    }

    let response = forward(&state, &rule, &method, &path_and_query, &headers, body)
        .await
        .map_err(warp::reject::custom)?;

    info!(
        %method,
        path = full_path.as_str(),
        target = %rule.target,
        status = response.status().as_u16(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "proxied"
    );

    Ok(response)
}

pub async fn preflight(
    method: Method,
    headers: HeaderMap,
    state: Arc<AppState>,
) -> Result<Response<Body>, Rejection> {
    // A method rejection here would mask 404s from the other routes.
    if method != Method::OPTIONS || !state.config.server.cors {
        return Err(warp::reject::not_found());
    }
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    *response.headers_mut() = preflight_headers(&headers);
    Ok(response)
}

pub fn env_json(state: Arc<AppState>) -> impl Reply {
    warp::reply::json(&state.env)
}
