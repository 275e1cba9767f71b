// src/main.rs

use std::{net::SocketAddr, sync::Arc, time::Duration};

use dotenvy::dotenv;
use quiz_backend::{
    config::Config,
    engine,
    routes,
    state::AppState,
    store::{MemoryStore, PgStore, SharedStore},
    utils::hash::hash_password,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let mut config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    config.admin_password_hash = match std::env::var("ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => {
            Some(hash_password(&password).expect("Failed to hash ADMIN_PASSWORD"))
        }
        _ => None,
    };
    if config.admin_username.is_none() || config.admin_password_hash.is_none() {
        tracing::warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set; admin login is disabled");
    }

    let store = connect_store(&config).await;

    // Heal a cache left stale by a previous run
    if let Err(e) = engine::refresh_category_status(store.as_ref()).await {
        tracing::error!("Failed to refresh category status at startup: {}", e);
    }

    let state = AppState {
        store,
        config: config.clone(),
    };

    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listening address");

    axum::serve(listener, app).await.expect("Server error");
}

/// Connects to Postgres when `DATABASE_URL` is set (retrying while the
/// database starts up), otherwise falls back to the in-memory store.
async fn connect_store(config: &Config) -> SharedStore {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set; using in-memory storage, data will not survive a restart");
        return Arc::new(MemoryStore::new());
    };

    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    Arc::new(PgStore::new(pool))
}
