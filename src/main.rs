use std::sync::Arc;

use budget_api_rust::config;
use budget_api_rust::database::PgStore;
use budget_api_rust::server::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting budget API in {:?} mode", config.environment);

    let store = PgStore::connect_from_env(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));
    store
        .migrate()
        .await
        .unwrap_or_else(|e| panic!("failed to run migrations: {}", e));

    let app = app(
        AppState {
            store: Arc::new(store),
        },
        config,
    );

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("budget API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
