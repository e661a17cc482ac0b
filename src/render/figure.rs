//! Plotly figure model
//!
//! Serialises to the `{data, layout, config}` JSON object that Plotly's
//! `newPlot` accepts. Only the attributes the dashboard uses are modelled.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// A complete renderable figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub config: PlotConfig,
}

impl Figure {
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Self {
            data,
            layout,
            config: PlotConfig::default(),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        // Figure contains only string keys and finite-or-null numbers
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotConfig {
    pub display_mode_bar: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            display_mode_bar: false,
        }
    }
}

/// One data layer of a figure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(ScatterTrace),
    Bar(BarTrace),
    Pie(PieTrace),
    Choroplethmapbox(ChoroplethTrace),
}

/// Lines and/or markers; `None` coordinates break a line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<String>,
    pub hoverinfo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    pub name: String,
    pub geojson: JsonValue,
    pub featureidkey: String,
    pub locations: Vec<String>,
    pub z: Vec<f64>,
    pub colorscale: Vec<(f64, String)>,
    pub showscale: bool,
    pub showlegend: bool,
    pub hovertext: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    pub autosize: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    /// How bars sharing an x value combine; Plotly defaults to `group`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    pub margin: Margin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapbox: Option<Mapbox>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Title {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: None,
            y: None,
            xanchor: None,
            yanchor: None,
            font: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zeroline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl Axis {
    /// Axis with no grid, zero line, ticks or labels
    pub fn hidden() -> Self {
        Self {
            title: None,
            showgrid: Some(false),
            zeroline: Some(false),
            visible: Some(false),
        }
    }

    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Some(Title::text(text)),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Margin {
    pub t: u32,
    pub l: u32,
    pub r: u32,
    pub b: u32,
}

impl Margin {
    pub fn uniform(px: u32) -> Self {
        Self {
            t: px,
            l: px,
            r: px,
            b: px,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mapbox {
    pub style: String,
    pub center: GeoPoint,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}
