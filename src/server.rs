use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::client::{HttpMessageSource, MessageSource};
use crate::config::AppConfig;
use crate::ui::render_page;
use crate::view::MessagesView;

/// Head room on top of the render timeout before a request is abandoned.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(1);

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let source: Arc<dyn MessageSource> = Arc::new(HttpMessageSource::new(&config.endpoint)?);

    info!(
        name: "messages.endpoint.configured",
        endpoint = %source.describe(),
        strict_status = config.endpoint.require_success_status,
        "Message endpoint configured"
    );

    let state = AppState {
        source,
        config: Arc::clone(&config),
    };
    let app = build_router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let timeout_duration = state.config.server.render_timeout() + REQUEST_TIMEOUT_SLACK;

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout_duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .with_state(state)
}

/// GET / - Mount a fresh view, wait for it to settle and render the page.
///
/// If the endpoint is slower than the render timeout the page shows the
/// loading state; the view is unmounted either way.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let view = MessagesView::mount(Arc::clone(&state.source));
    let snapshot = view
        .settled_within(state.config.server.render_timeout())
        .await;
    view.unmount().await;

    tracing::debug!(
        state = snapshot.label(),
        count = snapshot.messages().len(),
        "Rendering messages page"
    );

    Html(render_page(&snapshot))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    endpoint: String,
}

/// GET /health - Liveness probe.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        endpoint: state.source.describe(),
    })
}
