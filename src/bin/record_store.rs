//! HTTP record store for health details and dietary data

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use eatwise::build_info;
use eatwise::config::StoreConfig;
use eatwise::http;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("eatwise=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner("Record Store");

    let config = StoreConfig::from_env()?;
    let store = config.open_store()?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %listener.local_addr()?,
        backend = store.backend_kind(),
        "record store listening"
    );

    axum::serve(listener, http::router(store)).await?;

    Ok(())
}
