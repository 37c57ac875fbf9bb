use blog_api_rust::{app, config, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up JWT_SECRET, ADMIN_PASSWORD, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting blog API in {:?} mode", config.environment);

    let state = AppState::new();
    state.bootstrap().await;

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("blog API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
