// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_source::HttpResultSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    chart_option, chart_svg, dashboard_page, health_check, last_updated, update_viewport,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create result source (infrastructure layer)
    let source = Arc::new(HttpResultSource::new(
        config.source.base_url.clone(),
        config.source.timeout_secs,
    )?);

    // Build the page and start loading every panel (application layer)
    let dashboard = DashboardService::initialize(source, &config);
    let viewport = dashboard.viewport();
    tracing::info!("Charts laid out at {}x{} until the page reports its size", viewport.width, viewport.height);

    let state = Arc::new(AppState {
        title: "Test results".to_string(),
        dashboard,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/", get(dashboard_page))
        .route("/healthz", get(health_check))
        .route("/panels/:index/chart.svg", get(chart_svg))
        .route("/panels/:index/option", get(chart_option))
        .route("/panels/:index/last-updated", get(last_updated))
        .route("/viewport", post(update_viewport))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        "Starting results-dashboard on {} for {} panel(s) from {}",
        addr,
        config.panels.len(),
        config.source.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
