//! HTTP front end: `POST /api/link-label` in front of a [`Resolver`].

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::resolver::{MetricSource, Resolver};

/// Message returned to clients when resolution fails. Upstream detail is
/// only logged.
pub const RESOLVE_FAILED: &str = "failed to resolve link label";

pub const INVALID_REQUEST: &str = "invalid request body";

/// A graph node given either as a bare id or as an object carrying `id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    Id(String),
    Node { id: String },
}

impl NodeRef {
    pub fn id(&self) -> &str {
        match self {
            NodeRef::Id(id) | NodeRef::Node { id } => id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkLabelRequest {
    pub source: NodeRef,
    pub target: NodeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LinkLabelResponse {
    Resolved { success: bool, label: Option<String> },
    Failed { success: bool, error: String },
}

impl LinkLabelResponse {
    pub fn resolved(label: Option<String>) -> Self {
        Self::Resolved {
            success: true,
            label,
        }
    }

    pub fn failed(error: &str) -> Self {
        Self::Failed {
            success: false,
            error: error.to_string(),
        }
    }
}

/// Build the application router.
pub fn router<S>(resolver: Arc<Resolver<S>>) -> Router
where
    S: MetricSource + 'static,
{
    Router::new()
        .route("/api/link-label", post(link_label::<S>))
        .route("/health", get(health))
        .with_state(resolver)
}

async fn link_label<S>(
    State(resolver): State<Arc<Resolver<S>>>,
    payload: Result<Json<LinkLabelRequest>, JsonRejection>,
) -> Response
where
    S: MetricSource + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected link label request");
            return (
                rejection.status(),
                Json(LinkLabelResponse::failed(INVALID_REQUEST)),
            )
                .into_response();
        }
    };
    let (source, target) = (request.source.id(), request.target.id());
    match resolver.resolve(source, target).await {
        Ok(label) => (StatusCode::OK, Json(LinkLabelResponse::resolved(label))).into_response(),
        Err(e) => {
            error!(source, target, error = %e, "link label resolution failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LinkLabelResponse::failed(RESOLVE_FAILED)),
            )
                .into_response()
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Serve until Ctrl-C.
pub async fn serve<S>(listener: TcpListener, resolver: Arc<Resolver<S>>) -> std::io::Result<()>
where
    S: MetricSource + 'static,
{
    info!(addr = ?listener.local_addr().ok(), "listening");
    axum::serve(listener, router(resolver))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
