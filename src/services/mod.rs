use crate::errors::DevServerError;
use crate::middleware::add_cors_headers;
use crate::models::{AppState, ProxyRule};
use bytes::Bytes;
use futures::TryStreamExt;
use hyper::{Body, HeaderMap, Method, Response, StatusCode};
use hyper::header::{HeaderName, HeaderValue};
use reqwest::header as upstream;
use reqwest::Url;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};


pub const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Header names listed in a `Connection` value only apply to the current hop.
fn connection_scoped(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(hyper::header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

pub fn upstream_url(rule: &ProxyRule, path_and_query: &str) -> Result<Url, DevServerError> {
    let path = rule.rewrite_path(path_and_query);
    let uri_str = format!("{}{}", rule.target.trim_end_matches('/'), path);
    Url::parse(&uri_str).map_err(|e| {
        warn!(uri = %uri_str, error = %e, "failed to parse upstream URI");
        DevServerError::InvalidUri(e.to_string())
    })
}

pub fn upstream_headers(rule: &ProxyRule, headers: &HeaderMap, url: &Url) -> upstream::HeaderMap {
    let scoped = connection_scoped(headers);
    let mut out = upstream::HeaderMap::new();

    for (name, value) in headers.iter() {
        let name = name.as_str();
        if is_hop_by_hop(name) || scoped.iter().any(|s| s == name) || name == "content-length" {
            continue;
        }
        if rule.change_origin && name == "host" {
            continue;
        }
        match (
            upstream::HeaderName::from_bytes(name.as_bytes()),
            upstream::HeaderValue::from_bytes(value.as_bytes()),
        ) {
            (Ok(name), Ok(value)) => {
                out.append(name, value);
            }
            _ => debug!(header = name, "dropping untranslatable request header"),
        }
    }

    if rule.change_origin {
        if let Some(host) = url.host_str() {
            let authority = match url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            };
            if let Ok(value) = upstream::HeaderValue::from_str(&authority) {
                out.insert(upstream::HOST, value);
            }
        }
        if out.contains_key(upstream::ORIGIN) {
            if let Ok(value) = upstream::HeaderValue::from_str(&url.origin().ascii_serialization()) {
                out.insert(upstream::ORIGIN, value);
            }
        }
    }

    out
}

pub fn response_headers(headers: &upstream::HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers.iter() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        match (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            (Ok(name), Ok(value)) => {
                out.append(name, value);
            }
            _ => debug!(header = name.as_str(), "dropping untranslatable response header"),
        }
    }
    out
}

/// Sends the request upstream and streams the answer back. The timeout only
/// covers the wait for response headers so long event streams are not cut.
pub async fn forward(
    state: &AppState,
    rule: &ProxyRule,
    method: &Method,
    path_and_query: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response<Body>, DevServerError> {
    let url = upstream_url(rule, path_and_query)?;
    let upstream_method = reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|e| DevServerError::Http(e.to_string()))?;

    let request = state
        .client
        .request(upstream_method, url.clone())
        .headers(upstream_headers(rule, headers, &url))
        .body(body)
        .build()
        .map_err(|e| {
            warn!(error = %e, "error building upstream request");
            DevServerError::Http(e.to_string())
        })?;

    let timeout_secs = state.config.server.request_timeout_secs;
    let upstream_response = match timeout(
        Duration::from_secs(timeout_secs),
        state.client.execute(request),
    ).await {
        Ok(result) => result.map_err(|e| {
            warn!(url = %url, error = %e, "error forwarding request");
            DevServerError::Upstream(e.to_string())
        })?,
        Err(_) => {
            warn!(url = %url, timeout_secs, "upstream did not answer in time");
            return Err(DevServerError::Timeout);
        }
    };

    let status = StatusCode::from_u16(upstream_response.status().as_u16())
        .map_err(|e| DevServerError::Upstream(e.to_string()))?;
    let mut headers = response_headers(upstream_response.headers());
    if state.config.server.cors {
        add_cors_headers(&mut headers);
    }

    let stream = upstream_response
        .bytes_stream()
        .inspect_err(|e| warn!(error = %e, "upstream body stream failed"));

    let mut response = Response::new(Body::wrap_stream(stream));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
