//! HTTP server for the dashboard

use super::handler::{
    analytics_handler, graph_data_handler, index_handler, reports_handler, status_handler,
};
use crate::analytics::{AnalyticsError, AnalyticsService};
use crate::graph::{DataStore, GraphError};
use crate::render::LayoutRenderer;
use crate::reports::ReportService;
use axum::{routing::get, Router};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Local authority district boundaries (December 2021, GB, full resolution)
pub const DEFAULT_GEOJSON_URL: &str = "https://raw.githubusercontent.com/thomasvalentine/Choropleth/main/Local_Authority_Districts_(December_2021)_GB_BFC.json";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub address: String,
    /// Port
    pub port: u16,
    /// Directory holding per-company report CSV files
    pub data_dir: PathBuf,
    /// Source of the analytics boundary GeoJSON
    pub geojson_url: String,
    /// Timeout for the boundary download
    pub fetch_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8000,
            data_dir: PathBuf::from("dashboard/data"),
            geojson_url: DEFAULT_GEOJSON_URL.to_string(),
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

/// Errors raised while bringing the server up
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to load company data: {0}")]
    Data(#[from] GraphError),

    #[error("Failed to set up analytics: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only state shared by every request
#[derive(Debug)]
pub struct AppState {
    pub store: DataStore,
    pub renderer: LayoutRenderer,
    pub reports: ReportService,
    pub analytics: AnalyticsService,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let store = DataStore::load()?;
        let analytics = AnalyticsService::new(config.geojson_url.clone(), config.fetch_timeout)?;
        Ok(Self {
            store,
            renderer: LayoutRenderer::default(),
            reports: ReportService::new(config.data_dir.clone()),
            analytics,
        })
    }

    /// Company shown when the index page is opened without a selection
    pub fn default_company(&self) -> Option<&str> {
        self.store.company_keys().next()
    }
}

/// Dashboard routes over the given state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/get_graph_data", get(graph_data_handler))
        .route("/get_graph_data/", get(graph_data_handler))
        .route("/reports", get(reports_handler))
        .route("/reports/", get(reports_handler))
        .route("/analytics", get(analytics_handler))
        .route("/analytics/", get(analytics_handler))
        .route("/api/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP server serving the dashboard page and its JSON API
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// Create a new HTTP server, loading the company dataset
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let state = Arc::new(AppState::from_config(&config)?);
        Ok(Self { config, state })
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<(), ServerError> {
        let app = build_router(Arc::clone(&self.state));

        let addr = format!("{}:{}", self.config.address, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!(
            companies = self.state.store.len(),
            "Dashboard available at http://{}", addr
        );

        axum::serve(listener, app).await?;

        Ok(())
    }
}
