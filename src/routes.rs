use crate::api::{self, ApiError, SharedState};
use axum::{
    response::{IntoResponse, Response},
    routing::{delete, get, patch, put},
    Router,
};
use std::any::Any;
use std::path::Path;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::error;

/// Build the full application router.
///
/// `public_dir` holds the browser client; unmatched paths get its `index.html`.
pub fn map_routes(state: SharedState, public_dir: &Path) -> Router {
    let index = ServeFile::new(public_dir.join("index.html"));

    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/tasks", get(api::list_tasks).post(api::create_task))
        .route("/api/tasks/stats", get(api::task_stats))
        .route("/api/tasks/completed/clear", delete(api::clear_completed))
        .route("/api/tasks/:id", put(api::update_task).delete(api::delete_task))
        .route("/api/tasks/:id/toggle", patch(api::toggle_task))
        // Static files
        .fallback_service(ServeDir::new(public_dir).fallback(index))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
}

/// A panicking handler becomes a 500; the server keeps running.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "handler panicked");

    ApiError::Internal("Internal server error").into_response()
}
