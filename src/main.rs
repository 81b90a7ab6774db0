// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::application::catalog_service::CatalogService;
use crate::application::dashboard_service::DashboardService;
use crate::domain::filter::Roster;
use crate::infrastructure::config::{load_app_config, load_dashboard_config};
use crate::infrastructure::mysql_repository::MysqlTicketRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{dashboard, filter_options, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;
    let dashboard_config = load_dashboard_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(
        MysqlTicketRepository::connect(&app_config.database.connection_url()).await?,
    );

    // Create services (application layer)
    let roster = Roster::new(dashboard_config.roster);
    let catalog_service = CatalogService::new(repository.clone(), roster.clone());
    let dashboard_service = DashboardService::new(repository, roster, dashboard_config.title);

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        catalog_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/filters", get(filter_options))
        .route("/dashboard", get(dashboard))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config.server.listen.parse()?;
    println!("Starting ticket-analytics service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
