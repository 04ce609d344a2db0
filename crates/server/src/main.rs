use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use server_api::{receive_submission, search_clients, ApiContext};
use shared::{
    domain::ClientOption,
    error::{ApiError, MethodNotAllowedBody},
    protocol::{ClientSearchQuery, SubmissionReceipt, CLIENTS_ROUTE, SUBMISSIONS_ROUTE},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};

mod app_state;
mod config;

use app_state::AppState;
use config::{build_directory, load_settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let directory = build_directory(&settings)?;
    let state = AppState {
        api: ApiContext { directory },
        max_body_bytes: settings.max_body_bytes,
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "intake server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.max_body_bytes;
    Router::new()
        .route("/healthz", get(healthz))
        .route(CLIENTS_ROUTE, get(http_search_clients))
        .route(
            SUBMISSIONS_ROUTE,
            post(http_receive_submission)
                .fallback(method_not_allowed)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body_bytes)),
        )
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_search_clients(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ClientSearchQuery>,
) -> Json<Vec<ClientOption>> {
    Json(search_clients(&state.api, &q.q))
}

async fn http_receive_submission(
    body: Bytes,
) -> Result<Json<SubmissionReceipt>, (StatusCode, Json<ApiError>)> {
    receive_submission(&body).map(Json).map_err(|err| {
        warn!(code = ?err.code, message = %err.message, "rejected submission");
        (StatusCode::BAD_REQUEST, Json(err))
    })
}

async fn method_not_allowed() -> (StatusCode, Json<MethodNotAllowedBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(MethodNotAllowedBody::default()),
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
