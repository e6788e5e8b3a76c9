use std::path::Path;

use axum::Router;
use common::env::ensure_data_dir;
use configs::AppConfig;
use service::storage::JsonFileSnapshotStore;
use service::AttendanceService;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the record store from `data_file` and compile the page templates.
pub async fn build_state(data_file: &Path) -> anyhow::Result<AppState> {
    let snapshots = JsonFileSnapshotStore::new(data_file);
    let service = AttendanceService::load(snapshots).await?;
    Ok(AppState::new(service)?)
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Public entry: build the app and serve it until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    ensure_data_dir(&cfg.storage.data_file).await?;
    let state = build_state(&cfg.storage.data_file).await?;
    let app = build_app(state);

    // 绑定地址并启动服务，Ctrl+C 时优雅停机
    let addr = cfg.bind_addr();
    info!(%addr, data_file = %cfg.storage.data_file.display(), "starting attendance server");
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
