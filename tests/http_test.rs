use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use orgdash::{build_router, AppState, ServerConfig};
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

fn test_app(data_dir: &std::path::Path) -> Router {
    let config = ServerConfig {
        data_dir: data_dir.to_path_buf(),
        // Nothing listens on the discard port
        geojson_url: "http://127.0.0.1:9/boundaries.json".to_string(),
        fetch_timeout: Duration::from_secs(2),
        ..ServerConfig::default()
    };
    build_router(Arc::new(AppState::from_config(&config).unwrap()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_graph_data_success() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get_json(
        test_app(dir.path()),
        "/get_graph_data/?company_name=CompanyC789&category=new_company",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["statistics"],
        json!({"total_companies": 4, "categories": 6, "hierarchy_depth": 3})
    );
    assert_eq!(body["info"]["description"], "CompanyC789 is a highly professional company");
    assert_eq!(
        body["plot"]["data"][1]["text"],
        json!(["CompanyC789", "Category C123", "Company C1"])
    );
    assert_eq!(body["plot"]["layout"]["width"], 1200);
    assert_eq!(body["plot"]["config"]["displayModeBar"], false);
}

#[tokio::test]
async fn test_graph_data_defaults_to_all_and_trims_name() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get_json(
        test_app(dir.path()),
        "/get_graph_data?company_name=%20Amalfi%20midco%20Ltd%2014185820%20",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plot"]["data"][1]["text"].as_array().unwrap().len(), 7);
    assert_eq!(body["statistics"]["total_companies"], 7);
}

#[tokio::test]
async fn test_graph_data_missing_company() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get_json(test_app(dir.path()), "/get_graph_data/?company_name=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No company name provided."}));

    let (status, _) = get_json(test_app(dir.path()), "/get_graph_data/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_query_is_json_error() {
    let dir = TempDir::new().unwrap();
    let uri = "/get_graph_data/?company_name=CompanyB1234&company_name=CompanyC789";
    let (status, body) = get_json(test_app(dir.path()), uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("company_name"));

    let uri = "/reports/?company_name=CompanyB1234&company_name=CompanyC789";
    let (status, body) = get_json(test_app(dir.path()), uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_graph_data_unknown_company() {
    let dir = TempDir::new().unwrap();
    let (status, body) =
        get_json(test_app(dir.path()), "/get_graph_data/?company_name=unknown-key").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Company 'unknown-key' not found."}));
}

#[tokio::test]
async fn test_graph_data_unknown_category_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get_json(
        test_app(dir.path()),
        "/get_graph_data/?company_name=CompanyB1234&category=mystery",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["plot"]["data"][1]["text"],
        json!(["CompanyB1234", "Category1234", "Category5678"])
    );
}

#[tokio::test]
async fn test_reports_placeholders() {
    let dir = TempDir::new().unwrap();

    let (status, body) = get_json(test_app(dir.path()), "/reports/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Please select a company to view reports."}));

    let (status, body) =
        get_json(test_app(dir.path()), "/reports/?company_name=CompanyB1234").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Data not available for the selected company."}));

    let (_, body) = get_json(test_app(dir.path()), "/reports/?company_name=..%2Fsecret").await;
    assert_eq!(body, json!({"message": "Data not available for the selected company."}));
}

#[tokio::test]
async fn test_reports_bad_csv_is_reported_gently() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("CompanyC789.csv"), "Provider type\nonly one column\n").unwrap();

    let (status, body) = get_json(test_app(dir.path()), "/reports/?company_name=CompanyC789").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "An error occurred while generating the report. Please try again later."})
    );
}

#[tokio::test]
async fn test_reports_charts() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Amalfi_midco_Ltd_14185820.csv"),
        "Provider type,Provider region,Overall effectiveness,Number of providers(% of chain)\n\
         Children's home,North West,Good,60\n\
         Residential school,London,Outstanding,40\n",
    )
    .unwrap();

    let (status, body) = get_json(
        test_app(dir.path()),
        "/reports/?company_name=Amalfi%20midco%20Ltd%2014185820",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let charts = &body["charts"];
    assert_eq!(charts["provider_chart"]["data"][0]["type"], "bar");
    assert_eq!(charts["region_chart"]["data"][0]["labels"], json!(["North West", "London"]));
    assert_eq!(
        charts["inspection_chart"]["data"][0]["x"],
        json!(["Good", "Outstanding"])
    );
}

#[tokio::test]
async fn test_analytics_fetch_failure() {
    let dir = TempDir::new().unwrap();
    let (status, body) =
        get_json(test_app(dir.path()), "/analytics/?company_name=CompanyB1234").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("An error occurred: "));
}

#[tokio::test]
async fn test_status() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get_json(test_app(dir.path()), "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["companies"], 4);
    assert_eq!(body["version"], orgdash::VERSION);
}

#[tokio::test]
async fn test_index_page() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(test_app(dir.path()), "/?company_name=CompanyD012").await;
    assert_eq!(status, StatusCode::OK);

    let html = String::from_utf8(body).unwrap();
    let companies = concat!(
        r#"const companies = ["Amalfi midco Ltd 14185820","CompanyB1234","#,
        r#""CompanyC789","CompanyD012"];"#
    );
    assert!(html.contains(companies));
    assert!(html.contains(r#"const selectedCompany = "CompanyD012";"#));
    assert!(html.contains(r#"const selectedCategory = "all";"#));
    assert!(!html.contains("{{"));
}

#[tokio::test]
async fn test_index_page_default_company() {
    let dir = TempDir::new().unwrap();
    let (_, body) = get(test_app(dir.path()), "/").await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains(r#"const selectedCompany = "Amalfi midco Ltd 14185820";"#));
}
