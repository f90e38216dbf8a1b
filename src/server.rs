use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use tracing::{debug, info};
use warp::{Filter, Reply};
use crate::config::ServerConfig;
use crate::errors::DevServerError;

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down dev server");
    }
}

/// Binds the configured port. Unless `strict_port` is set, a busy port moves
/// the server to the next free one above it.
pub fn bind<F>(
    filter: F,
    server: &ServerConfig,
) -> Result<(SocketAddr, impl Future<Output = ()> + 'static), DevServerError>
where
    F: Filter<Error = Infallible> + Clone + Send + Sync + 'static,
    F::Extract: Reply,
{
    let mut port = server.port;
    loop {
        let addr = SocketAddr::new(server.host, port);
        match warp::serve(filter.clone()).try_bind_with_graceful_shutdown(addr, shutdown_signal()) {
            Ok(bound) => return Ok(bound),
            Err(e) if !server.strict_port && port < u16::MAX => {
                debug!(%addr, error = %e, "port unavailable, trying the next one");
                info!("Port {} is in use, trying another one...", port);
                port += 1;
            }
            Err(e) => {
                return Err(DevServerError::Bind {
                    addr: addr.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// `http://localhost:<port>/` for loopback binds, the raw address otherwise.
pub fn local_url(addr: SocketAddr) -> String {
    if addr.ip().is_loopback() {
        format!("http://localhost:{}/", addr.port())
    } else {
        format!("http://{}/", addr)
    }
}
