use std::{error::Error, sync::Arc};

use task_tracker::{
    app_state::AppState, data_access::data_context::DataContext, map_routes,
    services::task_service::TaskService, settings::Settings,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // ── Environment & logging ──────────────────────────────────
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "loaded .env");
    }

    // ── Settings & task store ──────────────────────────────────
    let settings = Settings::load()?;
    let data_context = DataContext::open(&settings)?;
    if data_context.backend_name() == "local-file" {
        tracing::info!(path = %settings.tasks_file.display(), "using local task file");
    }

    // ── Shared state ───────────────────────────────────────────
    let state = Arc::new(AppState {
        task_service: TaskService::new(data_context),
    });

    // ── Router & start ─────────────────────────────────────────
    let app = map_routes(state);
    let address = settings.socket_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server running on http://{address}");

    axum::serve(listener, app).await?;
    Ok(())
}
