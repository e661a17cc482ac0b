//! Provider reports
//!
//! Each company may have a CSV export under the report data directory named
//! after the company with spaces replaced by underscores. The export lists
//! the providers in the company's chain; three charts are built from it.

use crate::render::figure::{Axis, BarTrace, Figure, Layout, Margin, PieTrace, Title, Trace};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading report data
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Data not available for company '{company}' at {}", .path.display())]
    DataUnavailable { company: String, path: PathBuf },

    #[error("Invalid report data: {0}")]
    Csv(#[from] csv::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

const SHARE_COLUMN: &str = "Number of providers(% of chain)";

/// One provider row of a company report
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderRow {
    #[serde(rename = "Provider type")]
    pub provider_type: String,
    #[serde(rename = "Provider region")]
    pub provider_region: String,
    #[serde(rename = "Overall effectiveness")]
    pub overall_effectiveness: String,
    #[serde(rename = "Number of providers(% of chain)")]
    pub share: f64,
}

/// The three report charts for a company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCharts {
    pub provider_chart: Figure,
    pub region_chart: Figure,
    pub inspection_chart: Figure,
}

/// Loads company report exports from a data directory
#[derive(Debug, Clone)]
pub struct ReportService {
    data_dir: PathBuf,
}

impl ReportService {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of a company's export, `None` for names that would escape the
    /// data directory
    pub fn report_path(&self, company: &str) -> Option<PathBuf> {
        if company.is_empty()
            || company.contains(['/', '\\'])
            || company.contains("..")
        {
            return None;
        }
        Some(self.data_dir.join(format!("{}.csv", company.replace(' ', "_"))))
    }

    pub fn load_rows(&self, company: &str) -> ReportResult<Vec<ProviderRow>> {
        let unavailable = |path: PathBuf| ReportError::DataUnavailable {
            company: company.to_string(),
            path,
        };

        let path = self
            .report_path(company)
            .ok_or_else(|| unavailable(self.data_dir.clone()))?;
        if !path.is_file() {
            return Err(unavailable(path));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)?;
        let rows = reader
            .deserialize()
            .collect::<Result<Vec<ProviderRow>, csv::Error>>()?;

        debug!(company, rows = rows.len(), path = %path.display(), "Loaded report data");
        Ok(rows)
    }

    pub fn charts(&self, company: &str) -> ReportResult<ReportCharts> {
        let rows = self.load_rows(company)?;
        Ok(build_charts(&rows))
    }
}

pub fn build_charts(rows: &[ProviderRow]) -> ReportCharts {
    ReportCharts {
        provider_chart: bar_chart(
            rows,
            |r| &r.provider_type,
            "Provider type",
            "Provider Types",
        ),
        region_chart: pie_chart(rows, |r| &r.provider_region, "Providers by Region"),
        inspection_chart: bar_chart(
            rows,
            |r| &r.overall_effectiveness,
            "Overall effectiveness",
            "Full Inspection Outcomes",
        ),
    }
}

fn chart_layout(title: &str) -> Layout {
    Layout {
        title: Some(Title::text(title)),
        autosize: true,
        margin: Margin {
            t: 30,
            l: 10,
            r: 10,
            b: 30,
        },
        ..Layout::default()
    }
}

fn bar_chart(
    rows: &[ProviderRow],
    category: impl Fn(&ProviderRow) -> &String,
    x_title: &str,
    title: &str,
) -> Figure {
    let trace = Trace::Bar(BarTrace {
        x: rows.iter().map(|r| category(r).clone()).collect(),
        y: rows.iter().map(|r| r.share).collect(),
    });
    // Rows sharing a category stack into one bar
    let layout = Layout {
        xaxis: Some(Axis::titled(x_title)),
        yaxis: Some(Axis::titled(SHARE_COLUMN)),
        barmode: Some("relative".to_string()),
        ..chart_layout(title)
    };
    Figure::new(vec![trace], layout)
}

// Plotly sums pie values that share a label
fn pie_chart(
    rows: &[ProviderRow],
    category: impl Fn(&ProviderRow) -> &String,
    title: &str,
) -> Figure {
    let trace = Trace::Pie(PieTrace {
        labels: rows.iter().map(|r| category(r).clone()).collect(),
        values: rows.iter().map(|r| r.share).collect(),
    });
    Figure::new(vec![trace], chart_layout(title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
Provider type,Provider region,Overall effectiveness,Number of providers(% of chain)
Children's home,North West,Good,40
Residential school,London,Outstanding,35.5
Children's home,London,Requires improvement,24.5
";

    fn service_with(company_file: &str, contents: &str) -> (TempDir, ReportService) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(company_file), contents).unwrap();
        let service = ReportService::new(dir.path());
        (dir, service)
    }

    #[test]
    fn test_report_path_replaces_spaces() {
        let service = ReportService::new("/data");
        assert_eq!(
            service.report_path("Amalfi midco Ltd 14185820"),
            Some(PathBuf::from("/data/Amalfi_midco_Ltd_14185820.csv"))
        );
    }

    #[test]
    fn test_report_path_rejects_traversal() {
        let service = ReportService::new("/data");
        assert_eq!(service.report_path("../etc/passwd"), None);
        assert_eq!(service.report_path("a\\b"), None);
        assert_eq!(service.report_path(""), None);
    }

    #[test]
    fn test_load_rows() {
        let (_dir, service) = service_with("Company_X.csv", SAMPLE);
        let rows = service.load_rows("Company X").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].provider_type, "Residential school");
        assert_eq!(rows[1].provider_region, "London");
        assert_eq!(rows[1].share, 35.5);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let service = ReportService::new(dir.path());
        let err = service.load_rows("CompanyB1234").unwrap_err();
        assert!(matches!(err, ReportError::DataUnavailable { .. }));
    }

    #[test]
    fn test_malformed_csv() {
        let contents = "\
Provider type,Provider region,Overall effectiveness,Number of providers(% of chain)
Home,London,Good,lots
";
        let (_dir, service) = service_with("Broken.csv", contents);
        assert!(matches!(service.load_rows("Broken"), Err(ReportError::Csv(_))));
    }

    #[test]
    fn test_charts() {
        let (_dir, service) = service_with("Company_X.csv", SAMPLE);
        let charts = service.charts("Company X").unwrap();

        let provider = charts.provider_chart.to_json();
        assert_eq!(provider["layout"]["title"]["text"], "Provider Types");
        assert_eq!(provider["data"][0]["type"], "bar");
        assert_eq!(provider["data"][0]["y"], serde_json::json!([40.0, 35.5, 24.5]));
        assert_eq!(provider["layout"]["margin"]["t"], 30);
        assert_eq!(provider["layout"]["barmode"], "relative");

        let region = charts.region_chart.to_json();
        assert_eq!(region["data"][0]["type"], "pie");
        assert!(region["layout"].get("barmode").is_none());
        assert_eq!(
            region["data"][0]["labels"],
            serde_json::json!(["North West", "London", "London"])
        );

        let inspection = charts.inspection_chart.to_json();
        assert_eq!(inspection["layout"]["title"]["text"], "Full Inspection Outcomes");
        assert_eq!(inspection["data"][0]["x"][2], "Requires improvement");
        assert_eq!(inspection["layout"]["barmode"], "relative");
    }

    #[test]
    fn test_repeated_categories_stack() {
        // Both "Children's home" rows stay as separate segments of one bar
        let (_dir, service) = service_with("Company_X.csv", SAMPLE);
        let charts = build_charts(&service.load_rows("Company X").unwrap());
        let provider = charts.provider_chart.to_json();
        assert_eq!(
            provider["data"][0]["x"],
            serde_json::json!(["Children's home", "Residential school", "Children's home"])
        );
        assert_eq!(provider["layout"]["barmode"], "relative");
    }
}
