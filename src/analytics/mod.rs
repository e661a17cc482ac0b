//! Regional risk analytics
//!
//! Draws a choropleth of regional risk levels over UK local authority
//! district boundaries. The boundary GeoJSON is fetched on demand from a
//! configurable URL with a bounded timeout.

use crate::render::figure::{
    ChoroplethTrace, Figure, Font, GeoPoint, Layout, Legend, Mapbox, Margin, Title, Trace,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// GeoJSON property naming each local authority district
pub const DISTRICT_NAME_PROPERTY: &str = "LAD21NM";

/// Errors raised while assembling the analytics map
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Client configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Boundary service returned status {0}")]
    HttpStatus(u16),

    #[error("Invalid boundary data: {0}")]
    InvalidGeoJson(String),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Risk bucket of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::High => "darkred",
            RiskLevel::Medium => "orange",
            RiskLevel::Low => "green",
        }
    }
}

/// One sampled region with its risk score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalRisk {
    pub city: &'static str,
    pub region: &'static str,
    pub value: u32,
    pub level: RiskLevel,
}

const fn sample(
    city: &'static str,
    region: &'static str,
    value: u32,
    level: RiskLevel,
) -> RegionalRisk {
    RegionalRisk {
        city,
        region,
        value,
        level,
    }
}

/// The compiled-in regional samples
pub fn regional_risk() -> Vec<RegionalRisk> {
    use RiskLevel::*;
    vec![
        sample("London", "City of London", 1200, High),
        sample("Berkshire", "Reading", 800, Medium),
        sample("Oxford", "Oxford", 750, Medium),
        sample("Brighton", "Brighton and Hove", 600, Low),
        sample("Bristol", "Bristol", 950, Medium),
        sample("Cambridge", "Cambridge", 700, Medium),
        sample("Southampton", "Southampton", 650, Low),
        sample("Portsmouth", "Portsmouth", 600, Low),
        sample("Manchester", "Manchester", 1100, High),
        sample("Liverpool", "Liverpool", 1000, High),
        sample("Leeds", "Leeds", 900, Medium),
        sample("Nottingham", "Nottingham", 850, Medium),
        sample("Sheffield", "Sheffield", 800, Medium),
        sample("Birmingham", "Birmingham", 1150, High),
        sample("Coventry", "Coventry", 780, Medium),
        sample("Leicester", "Leicester", 720, Medium),
        sample("Exeter", "Exeter", 650, Low),
        sample("Norwich", "Norwich", 600, Low),
    ]
}

/// Fetches boundary data and builds the analytics map
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    client: Client,
    geojson_url: String,
}

impl AnalyticsService {
    pub fn new(geojson_url: impl Into<String>, timeout: Duration) -> AnalyticsResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalyticsError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            geojson_url: geojson_url.into(),
        })
    }

    pub fn geojson_url(&self) -> &str {
        &self.geojson_url
    }

    /// Download the district boundaries
    pub async fn fetch_boundaries(&self) -> AnalyticsResult<JsonValue> {
        debug!(url = %self.geojson_url, "Fetching district boundaries");

        let resp = self
            .client
            .get(&self.geojson_url)
            .send()
            .await
            .map_err(|e| AnalyticsError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AnalyticsError::HttpStatus(resp.status().as_u16()));
        }

        resp.json()
            .await
            .map_err(|e| AnalyticsError::InvalidGeoJson(e.to_string()))
    }

    /// Fetch boundaries and assemble the risk choropleth
    pub async fn risk_map(&self) -> AnalyticsResult<Figure> {
        let mut geojson = self.fetch_boundaries().await?;
        assign_feature_ids(&mut geojson, DISTRICT_NAME_PROPERTY)?;
        let figure = choropleth_figure(&geojson, &regional_risk());
        info!("Analytics map assembled");
        Ok(figure)
    }
}

/// Copy each feature's `properties[property]` into its `id`
pub fn assign_feature_ids(geojson: &mut JsonValue, property: &str) -> AnalyticsResult<()> {
    let features = geojson
        .get_mut("features")
        .and_then(JsonValue::as_array_mut)
        .ok_or_else(|| AnalyticsError::InvalidGeoJson("missing 'features' array".to_string()))?;

    for feature in features.iter_mut() {
        let id = feature
            .get("properties")
            .and_then(|p| p.get(property))
            .cloned()
            .unwrap_or(JsonValue::Null);
        if let Some(obj) = feature.as_object_mut() {
            obj.insert("id".to_string(), id);
        }
    }
    Ok(())
}

/// One choropleth trace per risk level, in first-seen order
pub fn choropleth_figure(geojson: &JsonValue, samples: &[RegionalRisk]) -> Figure {
    let mut levels: Vec<RiskLevel> = Vec::new();
    for s in samples {
        if !levels.contains(&s.level) {
            levels.push(s.level);
        }
    }

    let data = levels
        .iter()
        .map(|level| {
            let members: Vec<&RegionalRisk> =
                samples.iter().filter(|s| s.level == *level).collect();
            Trace::Choroplethmapbox(ChoroplethTrace {
                name: level.as_str().to_string(),
                geojson: geojson.clone(),
                featureidkey: format!("properties.{}", DISTRICT_NAME_PROPERTY),
                locations: members.iter().map(|s| s.region.to_string()).collect(),
                z: vec![1.0; members.len()],
                colorscale: vec![
                    (0.0, level.color().to_string()),
                    (1.0, level.color().to_string()),
                ],
                showscale: false,
                showlegend: true,
                hovertext: members
                    .iter()
                    .map(|s| format!("{} ({}): {}", s.city, s.region, s.value))
                    .collect(),
            })
        })
        .collect();

    let layout = Layout {
        title: Some(Title {
            text: "London & Surrounding Areas Analytics".to_string(),
            x: Some(0.5),
            y: Some(0.95),
            xanchor: Some("center".to_string()),
            yanchor: Some("top".to_string()),
            font: Some(Font {
                size: 24,
                color: "darkblue".to_string(),
            }),
        }),
        autosize: true,
        legend: Some(Legend {
            title: Title::text("Risk Level"),
        }),
        margin: Margin {
            t: 50,
            l: 0,
            r: 0,
            b: 0,
        },
        mapbox: Some(Mapbox {
            style: "carto-positron".to_string(),
            center: GeoPoint {
                lat: 51.5,
                lon: -0.12,
            },
            zoom: 5.0,
        }),
        ..Layout::default()
    };

    Figure::new(data, layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn boundaries() -> JsonValue {
        json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"LAD21NM": "Leeds"}, "geometry": null},
                {"type": "Feature", "properties": {"LAD21NM": "Exeter"}, "geometry": null},
                {"type": "Feature", "properties": {}, "geometry": null}
            ]
        })
    }

    #[test]
    fn test_regional_samples() {
        let samples = regional_risk();
        assert_eq!(samples.len(), 18);
        assert_eq!(samples[0].region, "City of London");
        assert_eq!(samples[0].level, RiskLevel::High);
        assert_eq!(samples.iter().filter(|s| s.level == RiskLevel::Low).count(), 5);
    }

    #[test]
    fn test_assign_feature_ids() {
        let mut geojson = boundaries();
        assign_feature_ids(&mut geojson, DISTRICT_NAME_PROPERTY).unwrap();
        assert_eq!(geojson["features"][0]["id"], "Leeds");
        assert_eq!(geojson["features"][1]["id"], "Exeter");
        assert_eq!(geojson["features"][2]["id"], JsonValue::Null);
    }

    #[test]
    fn test_assign_feature_ids_requires_features() {
        let mut geojson = json!({"type": "FeatureCollection"});
        assert!(matches!(
            assign_feature_ids(&mut geojson, DISTRICT_NAME_PROPERTY),
            Err(AnalyticsError::InvalidGeoJson(_))
        ));
    }

    #[test]
    fn test_choropleth_traces_per_level() {
        let figure = choropleth_figure(&boundaries(), &regional_risk()).to_json();
        let data = figure["data"].as_array().unwrap();
        assert_eq!(data.len(), 3);

        let names: Vec<&str> = data.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["High", "Medium", "Low"]);

        let high = &data[0];
        assert_eq!(high["type"], "choroplethmapbox");
        assert_eq!(high["featureidkey"], "properties.LAD21NM");
        assert_eq!(
            high["locations"],
            json!(["City of London", "Manchester", "Liverpool", "Birmingham"])
        );
        assert_eq!(high["colorscale"], json!([[0.0, "darkred"], [1.0, "darkred"]]));
    }

    #[test]
    fn test_choropleth_layout() {
        let figure = choropleth_figure(&boundaries(), &regional_risk()).to_json();
        let layout = &figure["layout"];
        assert_eq!(layout["mapbox"]["style"], "carto-positron");
        assert_eq!(layout["mapbox"]["center"], json!({"lat": 51.5, "lon": -0.12}));
        assert_eq!(layout["title"]["text"], "London & Surrounding Areas Analytics");
        assert_eq!(layout["legend"]["title"]["text"], "Risk Level");
        assert_eq!(layout["margin"], json!({"t": 50, "l": 0, "r": 0, "b": 0}));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_network_error() {
        // Nothing listens on the discard port
        let service = AnalyticsService::new(
            "http://127.0.0.1:9/boundaries.json",
            Duration::from_secs(2),
        )
        .unwrap();
        assert!(matches!(
            service.risk_map().await,
            Err(AnalyticsError::NetworkError(_))
        ));
    }
}
