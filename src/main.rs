use std::sync::Arc;
use tracing::info;
use spark_dev_proxy::{
    AppState,
    DevServerError,
    ImportMetaEnv,
    browser::open_browser,
    config::{init_tracing, DEV_CONFIG},
    routes::routes,
    server::{bind, local_url},
};

#[tokio::main]
async fn main() -> Result<(), DevServerError> {
    init_tracing()?;

    let config = DEV_CONFIG.clone();
    let env = ImportMetaEnv::load(&config.root, &config.mode);
    let state = Arc::new(AppState::new(config, env)?);

    let (addr, server) = bind(routes(state.clone()), &state.config.server)?;

    let url = local_url(addr);
    info!(mode = %state.config.mode, "dev server running at {}", url);
    for rule in &state.config.server.proxy {
        info!(context = %rule.context, target = %rule.target, "proxying");
    }

    if state.config.server.open {
        open_browser(url);
    }

    server.await;
    Ok(())
}
