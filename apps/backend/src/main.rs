use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use omdb_backend::{config::Config, router, AppState};
use omdb_search::{build_http_client, MemoryCache, MovieSearchAggregator, OmdbClient};

fn init_tracing() {
    // RUST_LOG environment variable controls log levels
    // Default: debug for our crates, info for axum, warn for dependencies
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("omdb_backend=debug,omdb_search=debug,tower_http=debug,axum=info,warn")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    // Initialize tracing first so we can log configuration loading
    init_tracing();

    tracing::info!("Starting movie search backend v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load() {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            tracing::debug!("Server: {}:{}", cfg.server.host, cfg.server.port);
            tracing::debug!("OMDB: {:?}", cfg.omdb);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let api_key = match config.omdb.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => key.to_string(),
        _ => {
            tracing::error!("OMDB API key not configured, set MOVIE_SEARCH_OMDB__API_KEY");
            std::process::exit(1);
        }
    };

    // One HTTP session for the whole process, shared by every search
    let http = match build_http_client(config.omdb.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let omdb_client = match OmdbClient::new(http, api_key) {
        Ok(client) => client.with_base_url(config.omdb.base_url.clone()),
        Err(e) => {
            tracing::error!("Failed to create OMDB client: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(base_url = %omdb_client.base_url(), "OMDB client initialized");

    let cache = MemoryCache::new(config.cache.max_capacity);
    let search = MovieSearchAggregator::new(Arc::new(omdb_client), Arc::new(cache))
        .with_settings(config.search_settings());

    let addr = config.server_addr();
    let state = AppState::new(search);
    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Movie search backend listening on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    // The router (and with it the shared HTTP session and cache) was dropped
    // when the server future completed.
    tracing::info!("Movie search backend stopped");
}
