use anyhow::Context;
use std::sync::Arc;
use tasklist_server::{logging, map_routes, AppState, SaveFile, Settings, SharedState, TaskService};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    logging::init(&settings.log_filter);

    // ── Open the save file ─────────────────────────────────────
    let save_file = SaveFile::open(&settings.data_file)
        .with_context(|| format!("failed to open {}", settings.data_file.display()))?;

    let service = TaskService::new(save_file);
    info!(
        tasks = service.list_tasks().len(),
        path = %settings.data_file.display(),
        "task list loaded"
    );

    // ── Shared state ───────────────────────────────────────────
    let state: SharedState = Arc::new(AppState { service });

    // ── Router ─────────────────────────────────────────────────
    let app = map_routes(state, &settings.public_dir);

    // ── Start ──────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind((
        settings.tcp_socket_binding.as_str(),
        settings.tcp_socket_port,
    ))
    .await
    .with_context(|| {
        format!(
            "failed to bind {}:{}",
            settings.tcp_socket_binding, settings.tcp_socket_port
        )
    })?;

    info!("Task list server running at http://localhost:{}", settings.tcp_socket_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
