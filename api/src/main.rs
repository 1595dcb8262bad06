//! RKSC Ledger API Server
//!
//! Club membership ledger: members, monthly dues and payments, stored as one
//! small text file per member in a blob store.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::Uri,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod error;
mod handlers;
mod report;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod integration_tests;

use adapters::{DropboxBlobStore, FsBlobStore};
use app::{LedgerService, LedgerSettings, MONTHLY_FEE};
use config::{Config, StorageBackend};
use domain::ports::BlobStore;
use error::AppError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService<dyn BlobStore>>,
    pub club_name: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Build the HTTP router over `state`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/members",
            get(handlers::list_members).post(handlers::add_member),
        )
        .route("/members/:member_id", get(handlers::get_member))
        .route(
            "/members/:member_id/payments",
            post(handlers::record_payment),
        )
        .route("/dues", get(handlers::get_dues))
        .route("/dues/report", get(handlers::get_due_report))
        .fallback(not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_store(storage: &StorageBackend) -> Arc<dyn BlobStore> {
    match storage {
        StorageBackend::Filesystem { data_dir } => {
            tracing::info!("Storing members under {}", data_dir.display());
            Arc::new(FsBlobStore::new(data_dir.clone()))
        }
        StorageBackend::Dropbox {
            access_token,
            api_url,
            content_url,
        } => {
            tracing::info!("Storing members in Dropbox via {}", api_url);
            Arc::new(DropboxBlobStore::new(
                api_url.clone(),
                content_url.clone(),
                access_token.clone(),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rksc_ledger_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RKSC ledger API...");

    // Load configuration
    let config = Config::from_env().context("Invalid configuration")?;
    tracing::info!(
        storage = config.storage.name(),
        namespace = %config.member_namespace,
        prefix = %config.member_id_prefix,
        "Configuration loaded"
    );

    // Create adapters and services
    let store = build_store(&config.storage);
    let ledger = Arc::new(LedgerService::new(
        store,
        LedgerSettings {
            namespace: config.member_namespace.clone(),
            id_prefix: config.member_id_prefix.clone(),
            monthly_fee: MONTHLY_FEE,
        },
    ));

    let state = AppState {
        ledger,
        club_name: config.club_name.clone(),
    };
    let app = build_router(state);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
