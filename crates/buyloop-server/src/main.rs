mod api;
mod middleware;

use std::sync::Arc;

use buyloop_store::Store;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState, SearchDefaults},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = buyloop_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(?config, "starting buyloop-server");

    let mut store = Store::open(&config.data_path)?;
    if store.businesses().is_empty() {
        match buyloop_core::load_catalog(&config.catalog_path) {
            Ok(seed) => {
                store.seed_if_empty(seed)?;
            }
            Err(e) => tracing::warn!(
                error = %e,
                path = %config.catalog_path.display(),
                "seed catalog unavailable; starting with an empty catalog"
            ),
        }
    }

    let auth = AuthState::from_keys(&config.api_keys, config.is_development())?;
    let state = AppState {
        store: Arc::new(RwLock::new(store)),
        defaults: SearchDefaults {
            reference_point: config.reference_point,
            distance_km: config.default_distance_km,
        },
    };
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
