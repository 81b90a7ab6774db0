// Dashboard domain model: the tile and chart datasets the page renders
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartData>,
}

impl Dashboard {
    pub fn new(title: String, tiles: Vec<TileData>, charts: Vec<ChartData>) -> Self {
        Self {
            title,
            tiles,
            charts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: i32,
}

impl TileData {
    pub fn new(id: String, title: String, unit: String, value: f64, precision: i32) -> Self {
        Self {
            id,
            title,
            unit,
            value,
            precision,
        }
    }
}

/// One fully-shaped chart dataset. Layout, colors and widget placement are
/// the client's concern; this is only the data in render order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChartData {
    Bar(BarChart),
    GroupedBar(GroupedBarChart),
    Line(LineChart),
    SlotBreakdown(SlotChart),
    Heatmap(HeatmapChart),
}

impl ChartData {
    pub fn id(&self) -> &str {
        match self {
            ChartData::Bar(c) => &c.id,
            ChartData::GroupedBar(c) => &c.id,
            ChartData::Line(c) => &c.id,
            ChartData::SlotBreakdown(c) => &c.id,
            ChartData::Heatmap(c) => &c.id,
        }
    }
}

/// Single-series bar chart over categories.
#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub id: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub bars: Vec<BarPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarPoint {
    pub category: String,
    pub value: f64,
    /// Pre-formatted value label (counts, `HH:MM:SS`, percentages).
    pub label: String,
}

/// Several named series over a shared category axis.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedBarChart {
    pub id: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub categories: Vec<String>,
    pub series: Vec<CategorySeries>,
}

/// Values aligned to the chart's categories; `None` where the series has no
/// bar for that category.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineChart {
    pub id: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<LinePoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinePoint {
    pub x: String,
    pub y: f64,
    pub label: String,
}

/// Stacked bars per category over the time-slot axis, plus a total overlay
/// line across all slots.
#[derive(Debug, Clone, Serialize)]
pub struct SlotChart {
    pub id: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// Slot labels in chronological order.
    pub slots: Vec<String>,
    /// Per-slot totals, aligned to `slots`.
    pub total: Vec<f64>,
    pub stacks: Vec<SlotSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotSeries {
    pub name: String,
    /// Aligned to the chart's `slots`; zero where the series is absent.
    pub values: Vec<f64>,
}

/// Row-by-column matrix with pre-formatted cell text.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapChart {
    pub id: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub columns: Vec<String>,
    pub rows: Vec<String>,
    /// `values[row][column]`, `None` for empty cells.
    pub values: Vec<Vec<Option<f64>>>,
    /// Cell labels aligned with `values`; empty string for empty cells.
    pub text: Vec<Vec<String>>,
}
