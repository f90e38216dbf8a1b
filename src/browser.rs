use tracing::{info, warn};

/// Opens `url` in the default browser on a blocking task. Failures are only logged.
pub fn open_browser(url: String) {
    tokio::task::spawn_blocking(move || match open::that(&url) {
        Ok(()) => info!(%url, "opened browser"),
        Err(e) => warn!(%url, error = %e, "could not open a browser"),
    });
}
