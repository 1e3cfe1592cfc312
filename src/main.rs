//! Microfibre - a small personal micro-blogging API.
//!
//! This binary starts the HTTP server and configures all components.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use microfibre::{
    config::Config,
    posts::PostService,
    server::{create_router, RouterConfig},
    store::{PostStore, SqlitePostStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Microfibre v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Database: {}", config.database_url);
    info!("  Pool size: {}", config.db_max_connections);
    info!(
        "  Page size: {} (max {})",
        config.default_page_size, config.max_page_size
    );

    if config.auth_enabled {
        info!("  Auth: enabled");
    } else {
        warn!("  Auth: DISABLED - the /v1 routes are publicly accessible");
        warn!("        Enable for production: --auth-enabled=true --auth-token=<token>");
    }

    // Open the store
    let store = match SqlitePostStore::connect(&config.database_url, config.db_max_connections).await
    {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open database {}: {}", config.database_url, e);
            return ExitCode::FAILURE;
        }
    };

    match store.count_posts().await {
        Ok(count) => info!("  Found {} post(s)", count),
        Err(e) => {
            error!("Database check failed: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let posts = PostService::with_page_limits(store, config.page_limits());
    let router = create_router(posts, build_router_config(&config));

    // Bind and serve
    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!("  curl http://{}/status", addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "microfibre=debug,tower_http=debug"
    } else {
        "microfibre=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = if config.auth_enabled {
        RouterConfig::new(config.auth_token_or_empty())
    } else {
        RouterConfig::without_auth()
    };

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
