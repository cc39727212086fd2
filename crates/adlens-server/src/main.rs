use adlens_server::state::{AppState, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adlens_server=info,adlens_pipeline=info".into()),
        )
        .init();

    let settings = Settings::from_env();
    let state = AppState::from_settings(&settings);
    let app = adlens_server::app_router(state);

    let addr = format!("0.0.0.0:{}", settings.port);
    tracing::info!("Adlens server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
