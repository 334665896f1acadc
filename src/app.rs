use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response},
    routing::get,
    Router,
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::{field, info, info_span, Span};

use crate::error::ApiError;
use crate::state::AppState;
use crate::{admin, links, messages, settings, teachers};

pub const API_PREFIX: &str = "/api";

pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        .merge(teachers::router())
        .merge(links::router())
        .merge(messages::router())
        .merge(settings::router())
        .merge(admin::router())
        .route("/health", get(|| async { "ok" }));

    Router::new()
        .nest(API_PREFIX, api)
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(request_trace())
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Sayfa bulunamadı.")
}

type RequestTrace = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request<Body>) -> Span,
    tower_http::trace::DefaultOnRequest,
    fn(&Response<Body>, Duration, &Span),
>;

/// One span per request; `status` and `ms` are filled in when the response leaves.
fn request_trace() -> RequestTrace {
    TraceLayer::new_for_http()
        .make_span_with(request_span as fn(&Request<Body>) -> Span)
        .on_response(record_response as fn(&Response<Body>, Duration, &Span))
}

fn request_span(req: &Request<Body>) -> Span {
    info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        status = field::Empty,
        ms = field::Empty,
    )
}

fn record_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status();
    span.record("status", status.as_u16());
    span.record("ms", latency.as_millis() as u64);
    if status.is_server_error() {
        tracing::error!(%status, "request failed");
    } else {
        tracing::debug!(%status, "request done");
    }
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler failed");
    }
    info!("shutting down");
}
