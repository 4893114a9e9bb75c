use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database};
use tracing::info;

use cinematch_sessions::config::SessionsConfig;
use cinematch_sessions::realtime::BroadcastHub;
use cinematch_sessions::router::build_router;
use cinematch_sessions::state::AppState;

#[tokio::main]
async fn main() {
    cinematch_core::tracing::init_tracing("sessions");

    let config = SessionsConfig::from_env();

    let mut options = ConnectOptions::new(&config.database_url);
    options
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5));
    let db = Database::connect(options)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        hub: Arc::new(BroadcastHub::new()),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.sessions_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("sessions service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
