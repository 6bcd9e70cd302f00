use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::auth::require_access;
use crate::presentation::handlers::{
    health_handler, index_handler, login_form_handler, login_handler, logout_handler,
    result_handler, upload_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let gated = Router::new()
        .route("/", get(index_handler))
        .route("/upload", post(upload_handler))
        .route("/result/{task_id}", get(result_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/login", get(login_form_handler).post(login_handler))
        .route("/logout", get(logout_handler))
        .merge(gated)
        .layer(DefaultBodyLimit::max(state.upload_limit_bytes))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
