mod client_ip;
mod extract;
mod routes;
mod voter;

use social_office_app::{AppConfig, AppContext};
use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let app_context = match AppContext::from_config(&config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Failed to start vote ledger: {}", e);
            std::process::exit(1);
        }
    };

    let app = routes::router(app_context, &config);

    tracing::info!("Listening on http://{}", config.bind_addr);
    tracing::info!(
        "Vote limits: {}/min, {}/hour per voter",
        config.vote_limits.per_minute,
        config.vote_limits.per_hour
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
