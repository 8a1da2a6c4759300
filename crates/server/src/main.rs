use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use server_lib::{routes, AppState, PricingConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let state = AppState::new(PricingConfig::from_env());
    if state.pricing.is_none() {
        tracing::info!("PRICING_SERVICE_URL not set, estimates are local-only");
    }

    let app = Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/inspect", post(routes::inspect))
        .route("/api/estimate", post(routes::estimate))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap();
    tracing::info!("Server running on http://localhost:{}", port);
    axum::serve(listener, app).await.unwrap();
}
