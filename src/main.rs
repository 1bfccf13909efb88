use axum::{extract::Request, ServiceExt};

use deelflow_api::config::AppConfig;
use deelflow_api::database::manager;
use deelflow_api::routes;
use deelflow_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT secret, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deelflow_api=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!("starting DeelFlow API in {:?} mode", config.environment);

    // DATABASE_URL selects the Postgres backend; without it the service runs
    // against the in-memory stores (demo mode).
    let state = match std::env::var("DATABASE_URL") {
        Ok(_) => {
            let pool = manager::connect(&config.database).await?;
            AppState::postgres(config, pool)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            AppState::in_memory(config)
        }
    };

    let app = routes::app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);
    let bind_addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}
