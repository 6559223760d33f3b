use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use routecast::api::DynAPI;
use routecast::config::Config;
use routecast::engine::Engine;
use routecast::error::Error;
use routecast::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "routecast=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let engine = Engine::from_config(&config)?;

    serve(Arc::new(engine) as DynAPI, config.listen_addr).await
}
