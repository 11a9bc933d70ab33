//! HTTP boundary.
//!
//! Routes:
//! - `GET /api/cep/{cep}/` (trailing slash optional)
//! - `GET /api/cep/?cep=...` (trailing slash optional)
//! - `GET /health`

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use cep_core::{CepLookup, WireResponse};
use serde::Deserialize;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::error::{ApiError, panic_response};

/// Query-string form of the lookup.
#[derive(Debug, Default, Deserialize)]
pub struct CepQuery {
    #[serde(default)]
    pub cep: String,
}

/// Build the application router.
pub fn router(lookup: CepLookup) -> Router {
    Router::new()
        .route("/api/cep/{cep}/", get(lookup_by_path))
        .route("/api/cep/{cep}", get(lookup_by_path))
        .route("/api/cep/", get(lookup_by_query))
        .route("/api/cep", get(lookup_by_query))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(lookup)
}

async fn lookup_by_path(
    State(lookup): State<CepLookup>, Path(cep): Path<String>,
) -> Result<Json<WireResponse>, ApiError> {
    let record = lookup.lookup(&cep).await?;
    Ok(Json(record.into()))
}

async fn lookup_by_query(
    State(lookup): State<CepLookup>, Query(query): Query<CepQuery>,
) -> Result<Json<WireResponse>, ApiError> {
    let record = lookup.lookup(&query.cep).await?;
    Ok(Json(record.into()))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, lookup: CepLookup) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "HTTP boundary listening");

    axum::serve(listener, router(lookup)).await?;

    Ok(())
}
