// View projection: turn aggregated groups or partitioned rows into named,
// coloured coordinate series for the rendering layer.
//
// Every view call receives its complete selection context and keeps no state
// between calls. Missing selections produce a `ViewResult::Message`
// placeholder; unknown pitch types are errors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, AggregateTable, GroupKey, MetricSpec, Statistic};
use crate::dataset::Dataset;
use crate::error::CoreError;
use crate::pitch::{Metric, PitchRecord, PitchType};
use crate::selection::{filter_allowed, partition, session_pitches, Emphasis, SelectionKey};

pub const SELECT_PITCH_TYPE: &str = "Select a Pitch Type";
pub const SELECT_STATISTIC: &str = "Select Aggregation Statistic";
pub const HOVER_FOR_SESSION: &str = "Hover Over Point to see All Pitch Speeds for Date";

const LEGEND_TITLE: &str = "Pitch Types";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Rendering constants that the deployment may tune.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Break plots span `[-axis_limit, axis_limit]` inches on both axes.
    pub axis_limit: f64,
    /// Opacity of non-selected points in highlight views.
    pub dim_opacity: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        ViewSettings {
            axis_limit: 30.0,
            dim_opacity: 0.25,
        }
    }
}

impl ViewSettings {
    fn opacity(&self, emphasis: Emphasis) -> f64 {
        match emphasis {
            Emphasis::Full => 1.0,
            Emphasis::Dimmed => self.dim_opacity,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A single axis value. Serialized bare (number, `YYYY-MM-DD`, or label).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Date(NaiveDate),
    Label(String),
}

/// Identity of a plotted point, sent back by the client on hover/click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointMeta {
    pub date: NaiveDate,
    pub athlete_name: String,
    pub pitch_type: String,
}

impl PointMeta {
    pub fn selection_key(&self) -> SelectionKey {
        SelectionKey::new(self.date, self.pitch_type.clone()).with_athlete(self.athlete_name.clone())
    }
}

impl From<&PitchRecord> for PointMeta {
    fn from(record: &PitchRecord) -> Self {
        PointMeta {
            date: record.date,
            athlete_name: record.athlete_name.clone(),
            pitch_type: record.pitch_type.clone(),
        }
    }
}

impl From<&GroupKey> for PointMeta {
    fn from(key: &GroupKey) -> Self {
        PointMeta {
            date: key.date,
            athlete_name: key.athlete_name.clone(),
            pitch_type: key.pitch_type.clone(),
        }
    }
}

/// One legend entry: parallel x, y and metadata vectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub color: &'static str,
    pub opacity: f64,
    pub x: Vec<Coordinate>,
    pub y: Vec<Coordinate>,
    pub meta: Vec<PointMeta>,
}

impl Series {
    pub fn new(pitch_type: PitchType, opacity: f64) -> Self {
        Series {
            name: pitch_type.name().to_string(),
            color: pitch_type.color(),
            opacity,
            x: Vec::new(),
            y: Vec::new(),
            meta: Vec::new(),
        }
    }

    pub fn push(&mut self, x: Coordinate, y: Coordinate, meta: PointMeta) {
        self.x.push(x);
        self.y.push(y);
        self.meta.push(meta);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Scatter,
    Line,
    Strip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

impl Axis {
    fn new(title: impl Into<String>) -> Self {
        Axis {
            title: title.into(),
            range: None,
        }
    }

    fn symmetric(title: impl Into<String>, limit: f64) -> Self {
        Axis {
            title: title.into(),
            range: Some([-limit, limit]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub chart: ChartKind,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub legend_title: String,
    /// Draw emphasised lines through the origin.
    pub zero_lines: bool,
    pub series: Vec<Series>,
}

/// Either a figure or a placeholder message for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewResult {
    Figure(Figure),
    Message { text: String },
}

impl ViewResult {
    pub fn message(text: impl Into<String>) -> Self {
        ViewResult::Message { text: text.into() }
    }

    pub fn figure(&self) -> Option<&Figure> {
        match self {
            ViewResult::Figure(f) => Some(f),
            ViewResult::Message { .. } => None,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, ViewResult::Message { .. })
    }
}

// ---------------------------------------------------------------------------
// View requests
// ---------------------------------------------------------------------------

/// Metrics with a per-session trend line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMetric {
    Velocity,
    TotalSpin,
    TrueSpin,
    SpinEfficiency,
}

impl TrendMetric {
    pub fn metric(&self) -> Metric {
        match self {
            TrendMetric::Velocity => Metric::Mph,
            TrendMetric::TotalSpin => Metric::TotalSpin,
            TrendMetric::TrueSpin => Metric::TrueSpin,
            TrendMetric::SpinEfficiency => Metric::SpinEfficiency,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TrendMetric::Velocity => "MPH",
            TrendMetric::TotalSpin => "Total Spin",
            TrendMetric::TrueSpin => "True Spin",
            TrendMetric::SpinEfficiency => "Spin Efficiency",
        }
    }

    fn y_axis_title(&self) -> &'static str {
        match self {
            TrendMetric::SpinEfficiency => "Spin Efficiency (%)",
            other => other.title(),
        }
    }
}

/// Which figure to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    BreakAggregate,
    BreakDetail,
    Trend(TrendMetric),
    VelocityStrip,
    ReleaseStart,
}

/// Full selection context for one view call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewQuery {
    pub pitch_types: Option<Vec<String>>,
    pub statistic: Option<Statistic>,
    pub selection: Option<SelectionKey>,
}

/// Build the requested view.
pub fn render(
    dataset: &Dataset,
    kind: ViewKind,
    query: &ViewQuery,
    settings: &ViewSettings,
) -> Result<ViewResult, CoreError> {
    let pitch_types = query.pitch_types.as_deref();
    match kind {
        ViewKind::BreakAggregate => break_aggregate(dataset, pitch_types, query.statistic, settings),
        ViewKind::BreakDetail => break_detail(dataset, pitch_types, query.selection.as_ref(), settings),
        ViewKind::Trend(metric) => metric_trend(dataset, pitch_types, query.statistic, metric),
        ViewKind::VelocityStrip => velocity_strip(dataset, pitch_types, query.selection.as_ref()),
        ViewKind::ReleaseStart => release_start(dataset, pitch_types, query.selection.as_ref(), settings),
    }
}

// ---------------------------------------------------------------------------
// Category resolution
// ---------------------------------------------------------------------------

/// Sort the requested labels lexicographically, drop duplicates, and bind
/// each to its palette entry. `None` means nothing is selected.
pub fn resolve_categories<S: AsRef<str>>(
    selected: Option<&[S]>,
) -> Result<Option<Vec<PitchType>>, CoreError> {
    let Some(selected) = selected.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let mut names: Vec<&str> = selected.iter().map(|s| s.as_ref()).collect();
    names.sort_unstable();
    names.dedup();
    names
        .into_iter()
        .map(PitchType::from_name)
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn category_names(categories: &[PitchType]) -> Vec<&'static str> {
    categories.iter().map(|p| p.name()).collect()
}

// ---------------------------------------------------------------------------
// Generic projections
// ---------------------------------------------------------------------------

/// One series per category from an aggregate table, reading the x and y
/// values from the named columns (or from the group date when `x_column` is
/// `None`).
pub fn project_groups(
    table: &AggregateTable,
    categories: &[PitchType],
    x_column: Option<&str>,
    y_column: &str,
) -> Vec<Series> {
    categories
        .iter()
        .map(|category| {
            let mut series = Series::new(*category, 1.0);
            for group in table.groups.iter().filter(|g| g.key.pitch_type == category.name()) {
                let x = match x_column {
                    Some(col) => table.value(group, col).map(Coordinate::Number),
                    None => Some(Coordinate::Date(group.key.date)),
                };
                let y = table.value(group, y_column).map(Coordinate::Number);
                if let (Some(x), Some(y)) = (x, y) {
                    series.push(x, y, PointMeta::from(&group.key));
                }
            }
            series
        })
        .collect()
}

/// One series per category for a layer of raw rows.
pub fn project_rows<F>(rows: &[&PitchRecord], categories: &[PitchType], opacity: f64, point: F) -> Vec<Series>
where
    F: Fn(&PitchRecord) -> (Coordinate, Coordinate),
{
    categories
        .iter()
        .map(|category| {
            let mut series = Series::new(*category, opacity);
            for row in rows.iter().filter(|r| r.pitch_type == category.name()) {
                let (x, y) = point(row);
                series.push(x, y, PointMeta::from(*row));
            }
            series
        })
        .collect()
}

/// Highlight layers for every category, in category order then emphasis order.
fn highlight_series(
    dataset: &Dataset,
    categories: &[PitchType],
    selection: Option<&SelectionKey>,
    settings: &ViewSettings,
    x: Metric,
    y: Metric,
) -> Vec<Series> {
    let names = category_names(categories);
    let part = partition(dataset.records(), &names, selection);
    let layers = part.layers();

    let mut series = Vec::new();
    for category in categories {
        for (emphasis, rows) in &layers {
            series.extend(project_rows(
                rows,
                std::slice::from_ref(category),
                settings.opacity(*emphasis),
                |r| (Coordinate::Number(x.value(r)), Coordinate::Number(y.value(r))),
            ));
        }
    }
    series
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Aggregated horizontal vs vertical break, one point per session group.
pub fn break_aggregate<S: AsRef<str>>(
    dataset: &Dataset,
    pitch_types: Option<&[S]>,
    statistic: Option<Statistic>,
    settings: &ViewSettings,
) -> Result<ViewResult, CoreError> {
    let Some(categories) = resolve_categories(pitch_types)? else {
        return Ok(ViewResult::message(SELECT_PITCH_TYPE));
    };
    let Some(statistic) = statistic else {
        return Ok(ViewResult::message(SELECT_STATISTIC));
    };

    let label = statistic.label();
    let x_col = format!("{label} Horizontal Break");
    let y_col = format!("{label} Vertical Break");
    let rows = filter_allowed(dataset.records(), &category_names(&categories));
    let table = aggregate(
        rows.iter().copied(),
        &[
            MetricSpec::labeled(Metric::HorizontalBreak, statistic, x_col.clone()),
            MetricSpec::labeled(Metric::VerticalBreak, statistic, y_col.clone()),
        ],
    )?;

    Ok(ViewResult::Figure(Figure {
        title: format!("Session {label}"),
        chart: ChartKind::Scatter,
        x_axis: Axis::symmetric(format!("{x_col} (Inches)"), settings.axis_limit),
        y_axis: Axis::symmetric(format!("{y_col} (Inches)"), settings.axis_limit),
        legend_title: LEGEND_TITLE.into(),
        zero_lines: true,
        series: project_groups(&table, &categories, Some(&x_col), &y_col),
    }))
}

/// Every pitch's break, with the selected session emphasised.
pub fn break_detail<S: AsRef<str>>(
    dataset: &Dataset,
    pitch_types: Option<&[S]>,
    selection: Option<&SelectionKey>,
    settings: &ViewSettings,
) -> Result<ViewResult, CoreError> {
    let Some(categories) = resolve_categories(pitch_types)? else {
        return Ok(ViewResult::message(SELECT_PITCH_TYPE));
    };

    Ok(ViewResult::Figure(Figure {
        title: "All Pitches".into(),
        chart: ChartKind::Scatter,
        x_axis: Axis::symmetric("Horizontal Break (Inches)", settings.axis_limit),
        y_axis: Axis::symmetric("Vertical Break (Inches)", settings.axis_limit),
        legend_title: LEGEND_TITLE.into(),
        zero_lines: true,
        series: highlight_series(
            dataset,
            &categories,
            selection,
            settings,
            Metric::HorizontalBreak,
            Metric::VerticalBreak,
        ),
    }))
}

/// Derived release-start coordinates, with the selected session emphasised.
pub fn release_start<S: AsRef<str>>(
    dataset: &Dataset,
    pitch_types: Option<&[S]>,
    selection: Option<&SelectionKey>,
    settings: &ViewSettings,
) -> Result<ViewResult, CoreError> {
    let Some(categories) = resolve_categories(pitch_types)? else {
        return Ok(ViewResult::message(SELECT_PITCH_TYPE));
    };

    Ok(ViewResult::Figure(Figure {
        title: "Pitch Start Points".into(),
        chart: ChartKind::Scatter,
        x_axis: Axis::new("Start X (Inches)"),
        y_axis: Axis::new("Start Y (Inches)"),
        legend_title: LEGEND_TITLE.into(),
        zero_lines: true,
        series: highlight_series(dataset, &categories, selection, settings, Metric::StartX, Metric::StartY),
    }))
}

/// Per-session aggregate of one metric as a line per pitch type.
pub fn metric_trend<S: AsRef<str>>(
    dataset: &Dataset,
    pitch_types: Option<&[S]>,
    statistic: Option<Statistic>,
    trend: TrendMetric,
) -> Result<ViewResult, CoreError> {
    let Some(categories) = resolve_categories(pitch_types)? else {
        return Ok(ViewResult::message(SELECT_PITCH_TYPE));
    };
    let Some(statistic) = statistic else {
        return Ok(ViewResult::message(SELECT_STATISTIC));
    };

    let label = statistic.label();
    let y_col = format!("{label} {}", trend.title());
    let rows = filter_allowed(dataset.records(), &category_names(&categories));
    let table = aggregate(
        rows.iter().copied(),
        &[MetricSpec::labeled(trend.metric(), statistic, y_col.clone())],
    )?;

    Ok(ViewResult::Figure(Figure {
        title: format!("Session {y_col}"),
        chart: ChartKind::Line,
        x_axis: Axis::new("Session Date"),
        y_axis: Axis::new(trend.y_axis_title()),
        legend_title: LEGEND_TITLE.into(),
        zero_lines: false,
        series: project_groups(&table, &categories, None, &y_col),
    }))
}

/// Every pitch speed thrown on the selected session date.
pub fn velocity_strip<S: AsRef<str>>(
    dataset: &Dataset,
    pitch_types: Option<&[S]>,
    selection: Option<&SelectionKey>,
) -> Result<ViewResult, CoreError> {
    let Some(categories) = resolve_categories(pitch_types)? else {
        return Ok(ViewResult::message(SELECT_PITCH_TYPE));
    };
    let Some(selection) = selection else {
        return Ok(ViewResult::message(HOVER_FOR_SESSION));
    };

    let rows = session_pitches(dataset.records(), &category_names(&categories), selection.date);
    let series = project_rows(&rows, &categories, 1.0, |r| {
        (Coordinate::Number(r.mph), Coordinate::Label(r.pitch_type.clone()))
    });

    Ok(ViewResult::Figure(Figure {
        title: format!("Session MPH: {}", selection.date),
        chart: ChartKind::Strip,
        x_axis: Axis::new("Pitch MPH"),
        y_axis: Axis::new("Pitch Type"),
        legend_title: LEGEND_TITLE.into(),
        zero_lines: false,
        series,
    }))
}
