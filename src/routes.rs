use std::convert::Infallible;
use std::sync::Arc;
use warp::http::Method;
use warp::path::FullPath;
use warp::{Filter, Rejection, Reply};
use crate::handlers;
use crate::models::{AppState, ProxyRule};

pub fn with_state(state: Arc<AppState>) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Extracts the first proxy rule whose context prefixes the request path.
pub fn matched_rule(state: Arc<AppState>) -> impl Filter<Extract = (ProxyRule,), Error = Rejection> + Clone {
    warp::path::full()
        .and(with_state(state))
        .and_then(|full_path: FullPath, state: Arc<AppState>| async move {
            state
                .match_rule(full_path.as_str())
                .cloned()
                .ok_or_else(warp::reject::not_found)
        })
}

/// GET/HEAD only. Other methods fall through as not-found instead of a
/// method rejection, which would outrank the 404 of sibling routes.
fn read_only() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::method()
        .and_then(|method: Method| async move {
            if method == Method::GET || method == Method::HEAD {
                Ok(())
            } else {
                Err(warp::reject::not_found())
            }
        })
        .untuple_one()
}

fn not_proxied(state: Arc<AppState>) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    read_only()
        .and(warp::path::full())
        .and(with_state(state))
        .and_then(|full_path: FullPath, state: Arc<AppState>| async move {
            match state.match_rule(full_path.as_str()) {
                Some(_) => Err(warp::reject::not_found()),
                None => Ok(()),
            }
        })
        .untuple_one()
}

pub fn routes(state: Arc<AppState>) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let preflight = warp::method()
        .and(warp::header::headers_cloned())
        .and(with_state(state.clone()))
        .and_then(handlers::preflight);

    let env = warp::path!("@env")
        .and(read_only())
        .and(with_state(state.clone()))
        .map(handlers::env_json);

    let proxy = matched_rule(state.clone())
        .and(warp::method())
        .and(warp::header::headers_cloned())
        .and(warp::path::full())
        .and(warp::query::raw().or_else(|_| async { Ok::<(String,), Infallible>((String::new(),)) }))
        .and(warp::body::bytes())
        .and(with_state(state.clone()))
        .and_then(handlers::proxy_request);

    let static_files = not_proxied(state.clone())
        .and(warp::fs::dir(state.config.root.clone()));

    preflight
        .or(env)
        .or(proxy)
        .or(static_files)
        .recover(handlers::handle_rejection)
}
