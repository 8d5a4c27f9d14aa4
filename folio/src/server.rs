//! Webhook server entrypoints live here.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{MatchedPath, State, rejection::JsonRejection},
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use folio_core::intent::UNKNOWN_INTENT_MESSAGE;
use folio_core::{WebhookRequest, WebhookResponse, handle_intent};
use folio_scanner::Storefront;
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};

pub const WEBHOOK_PATH: &str = "/webhook";
pub const HEALTHZ_PATH: &str = "/healthz";
const HEALTHZ_STATUS: &str = "ok";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address `{address}`: {source}")]
    InvalidListenAddr {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read local address: {source}")]
    LocalAddr {
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq)]
struct HealthzResponse {
    status: &'static str,
}

type AppState = Arc<Storefront>;

/// Routes without any listener attached, so tests can drive them directly.
pub fn build_router(storefront: Arc<Storefront>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            let path = request
                .extensions()
                .get::<MatchedPath>()
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|| request.uri().path().to_string());
            tracing::info_span!("http.request", method = %request.method(), path = %path)
        })
        .on_response(
            |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                let status = response.status().as_u16();
                let latency_ms = latency.as_millis().min(u128::from(u64::MAX)) as u64;
                tracing::info!(parent: span, status, latency_ms, "request completed");
            },
        )
        .on_failure(
            |error: ServerErrorsFailureClass, latency: Duration, span: &tracing::Span| {
                let latency_ms = latency.as_millis().min(u128::from(u64::MAX)) as u64;
                tracing::error!(parent: span, latency_ms, error = %error, "request failed");
            },
        );

    Router::new()
        .route(WEBHOOK_PATH, post(webhook))
        .route("/webhook/", post(webhook))
        .route(HEALTHZ_PATH, get(healthz))
        .layer(trace_layer)
        .with_state(storefront)
}

pub async fn serve(listen_addr: &str, storefront: Storefront) -> Result<(), ServerError> {
    let addr = parse_listen_addr(listen_addr)?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            address: addr.to_string(),
            source,
        })?;

    let local_addr = listener
        .local_addr()
        .map_err(|source| ServerError::LocalAddr { source })?;
    tracing::info!(%local_addr, storefront = %storefront.base_url(), "folio webhook listening");

    let app = build_router(Arc::new(storefront));
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .map_err(|source| ServerError::Serve { source })?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn webhook(
    State(storefront): State<AppState>,
    payload: Result<Json<WebhookRequest>, JsonRejection>,
) -> impl IntoResponse {
    match payload {
        Ok(Json(request)) => (
            StatusCode::OK,
            Json(handle_intent(&storefront, &request).await),
        ),
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected webhook body");
            (
                rejection.status(),
                Json(WebhookResponse::new(UNKNOWN_INTENT_MESSAGE)),
            )
        }
    }
}

async fn healthz() -> impl IntoResponse {
    Json(HealthzResponse {
        status: HEALTHZ_STATUS,
    })
}

pub fn parse_listen_addr(addr: &str) -> Result<SocketAddr, ServerError> {
    let trimmed = addr.trim();
    trimmed
        .parse()
        .map_err(|source| ServerError::InvalidListenAddr {
            address: trimmed.to_string(),
            source,
        })
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "failed to capture Ctrl+C signal");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to capture SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = sigterm => tracing::info!("received SIGTERM, shutting down"),
    }
}
