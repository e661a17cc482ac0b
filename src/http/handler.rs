//! HTTP handlers for the dashboard API

use super::server::AppState;
use crate::graph::{CategoryFilter, CompanyStats, GraphBuilder, GraphError};
use crate::render::PlotArtifact;
use crate::reports::{ReportCharts, ReportError};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(RustEmbed)]
#[folder = "src/http/static/"]
struct Assets;

pub const MISSING_COMPANY: &str = "No company name provided.";
pub const REPORT_PROMPT: &str = "Please select a company to view reports.";
pub const REPORT_UNAVAILABLE: &str = "Data not available for the selected company.";
pub const REPORT_FAILED: &str =
    "An error occurred while generating the report. Please try again later.";

fn default_category() -> String {
    "all".to_string()
}

/// Query string shared by the dashboard endpoints
#[derive(Debug, Deserialize)]
pub struct CompanyQuery {
    #[serde(default)]
    pub company_name: String,
    #[serde(default = "default_category")]
    pub category: String,
}

/// Successful graph data response
#[derive(Serialize)]
pub struct GraphDataResponse {
    plot: PlotArtifact,
    statistics: CompanyStats,
    info: CompanyInfo,
}

#[derive(Serialize)]
pub struct CompanyInfo {
    description: String,
}

/// Report charts, or a placeholder message shown in their place
#[derive(Serialize)]
#[serde(untagged)]
pub enum ReportResponse {
    Charts { charts: ReportCharts },
    Message { message: String },
}

impl ReportResponse {
    fn message(text: &str) -> Self {
        ReportResponse::Message {
            message: text.to_string(),
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn query_error(rejection: QueryRejection) -> Response {
    warn!(error = %rejection, "Rejected query string");
    error_response(rejection.status(), rejection.body_text())
}

// JSON for inline <script> use; "</" would close the script element early
fn script_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

/// Dashboard page with the company list and initial selection filled in
pub async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompanyQuery>,
) -> Response {
    let Some(page) = Assets::get("index.html") else {
        error!("index.html missing from embedded assets");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Dashboard page unavailable").into_response();
    };
    let template = String::from_utf8_lossy(page.data.as_ref());

    let selected = match query.company_name.trim() {
        "" => state.default_company().unwrap_or_default(),
        name => name,
    };
    let companies: Vec<&str> = state.store.company_keys().collect();

    let html = template
        .replace("{{companies}}", &script_json(&companies))
        .replace("{{selected_company}}", &script_json(selected))
        .replace("{{selected_category}}", &script_json(&query.category));

    Html(html).into_response()
}

/// Handler for hierarchy graph data
pub async fn graph_data_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CompanyQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_error(rejection),
    };
    let company = query.company_name.trim();
    if company.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, MISSING_COMPANY);
    }

    let category = CategoryFilter::parse(&query.category);
    let built = match GraphBuilder::new(&state.store).build(company, &category) {
        Ok(built) => built,
        Err(e @ GraphError::CompanyNotFound(_)) => {
            warn!(company, "Graph requested for unknown company");
            return error_response(StatusCode::NOT_FOUND, e.to_string());
        }
        Err(e) => {
            error!(company, error = %e, "Failed to build hierarchy graph");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let plot = match state.renderer.render_graph(&built.graph) {
        Ok(plot) => plot,
        Err(e) => {
            error!(company, error = %e, "Failed to lay out hierarchy graph");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    debug!(company, category = %category, "Serving graph data");
    Json(GraphDataResponse {
        plot,
        statistics: built.stats,
        info: CompanyInfo {
            description: built.description,
        },
    })
    .into_response()
}

/// Handler for report charts; failures become placeholder messages
pub async fn reports_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CompanyQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_error(rejection),
    };
    let company = query.company_name.trim();
    if company.is_empty() {
        return Json(ReportResponse::message(REPORT_PROMPT)).into_response();
    }

    let response = match state.reports.charts(company) {
        Ok(charts) => ReportResponse::Charts { charts },
        Err(ReportError::DataUnavailable { path, .. }) => {
            debug!(company, path = %path.display(), "No report data");
            ReportResponse::message(REPORT_UNAVAILABLE)
        }
        Err(e) => {
            error!(company, error = %e, "Error loading reports");
            ReportResponse::message(REPORT_FAILED)
        }
    };
    Json(response).into_response()
}

/// Handler for the regional analytics map
pub async fn analytics_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.analytics.risk_map().await {
        Ok(figure) => Json(json!({ "plot": figure })).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to build analytics map");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An error occurred: {}", e),
            )
        }
    }
}

/// Handler for system status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "companies": state.store.len(),
    }))
}
