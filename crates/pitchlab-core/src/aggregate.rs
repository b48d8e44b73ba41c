// Grouped aggregation: (Date, Athlete_Name, Pitch_Type) groups reduced with a
// closed set of statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::pitch::{Metric, PitchRecord};

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Reducer applied to every group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    Mean,
    Min,
    Max,
    Median,
    Q25,
    Q75,
}

impl Statistic {
    pub const ALL: [Statistic; 6] = [
        Statistic::Mean,
        Statistic::Min,
        Statistic::Max,
        Statistic::Median,
        Statistic::Q25,
        Statistic::Q75,
    ];

    /// Friendly label used in titles and axis names.
    pub fn label(&self) -> &'static str {
        match self {
            Statistic::Mean => "Mean",
            Statistic::Min => "Min",
            Statistic::Max => "Max",
            Statistic::Median => "Median",
            Statistic::Q25 => "25th Percentile",
            Statistic::Q75 => "75th Percentile",
        }
    }

    /// Suffix for generated column names (`MPH_mean`).
    pub fn suffix(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Median => "median",
            Statistic::Q25 => "q25",
            Statistic::Q75 => "q75",
        }
    }

    /// Reduce `values`. Returns NaN for an empty slice.
    pub fn apply(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        match self {
            Statistic::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Statistic::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Statistic::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Statistic::Median => quantile(values, 0.5),
            Statistic::Q25 => quantile(values, 0.25),
            Statistic::Q75 => quantile(values, 0.75),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Statistic {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" | "avg" | "average" => Ok(Statistic::Mean),
            "min" | "minimum" => Ok(Statistic::Min),
            "max" | "maximum" => Ok(Statistic::Max),
            "median" | "q50" | "50%" => Ok(Statistic::Median),
            "q25" | "25%" | "25th percentile" => Ok(Statistic::Q25),
            "q75" | "75%" | "75th percentile" => Ok(Statistic::Q75),
            _ => Err(CoreError::UnknownStatistic(s.to_string())),
        }
    }
}

/// Quantile with linear interpolation between the closest ranks
/// (position `q * (n - 1)` in the sorted values).
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Requests and results
// ---------------------------------------------------------------------------

/// One output column: a metric reduced with a statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSpec {
    pub metric: Metric,
    pub statistic: Statistic,
    /// Overrides the generated `{column}_{suffix}` name.
    pub label: Option<String>,
}

impl MetricSpec {
    pub fn new(metric: Metric, statistic: Statistic) -> Self {
        MetricSpec {
            metric,
            statistic,
            label: None,
        }
    }

    pub fn labeled(metric: Metric, statistic: Statistic, label: impl Into<String>) -> Self {
        MetricSpec {
            metric,
            statistic,
            label: Some(label.into()),
        }
    }

    pub fn column_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{}_{}", self.metric.column_name(), self.statistic.suffix()),
        }
    }
}

/// Grouping key. Ordering is (date, athlete, pitch type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey {
    pub date: NaiveDate,
    pub athlete_name: String,
    pub pitch_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedGroup {
    pub key: GroupKey,
    /// Number of input rows in the group.
    pub count: usize,
    /// One value per requested spec, in request order.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateTable {
    pub columns: Vec<String>,
    pub groups: Vec<AggregatedGroup>,
}

impl AggregateTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of `column` for `group`, if the column exists.
    pub fn value(&self, group: &AggregatedGroup, column: &str) -> Option<f64> {
        self.column_index(column)
            .and_then(|i| group.values.get(i).copied())
    }

    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Group `rows` by (Date, Athlete_Name, Pitch_Type) and reduce each spec.
///
/// Every group with at least one row appears exactly once. Callers are
/// expected to answer a missing metric/statistic selection before getting
/// here; an empty `specs` is reported as [`CoreError::NoMetrics`].
pub fn aggregate<'a, I>(rows: I, specs: &[MetricSpec]) -> Result<AggregateTable, CoreError>
where
    I: IntoIterator<Item = &'a PitchRecord>,
{
    if specs.is_empty() {
        return Err(CoreError::NoMetrics);
    }

    let mut groups: BTreeMap<(NaiveDate, &str, &str), Vec<&PitchRecord>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.date, row.athlete_name.as_str(), row.pitch_type.as_str()))
            .or_default()
            .push(row);
    }

    let groups = groups
        .into_iter()
        .map(|((date, athlete, pitch_type), members)| {
            let values = specs
                .iter()
                .map(|spec| {
                    let column: Vec<f64> = members.iter().map(|r| spec.metric.value(r)).collect();
                    spec.statistic.apply(&column)
                })
                .collect();
            AggregatedGroup {
                key: GroupKey {
                    date,
                    athlete_name: athlete.to_string(),
                    pitch_type: pitch_type.to_string(),
                },
                count: members.len(),
                values,
            }
        })
        .collect();

    Ok(AggregateTable {
        columns: specs.iter().map(MetricSpec::column_name).collect(),
        groups,
    })
}

/// Summary table for a single metric: all six statistics per group.
pub fn summarize<'a, I>(rows: I, metric: Metric) -> Result<AggregateTable, CoreError>
where
    I: IntoIterator<Item = &'a PitchRecord>,
{
    let specs: Vec<MetricSpec> = Statistic::ALL
        .iter()
        .map(|s| MetricSpec::new(metric, *s))
        .collect();
    aggregate(rows, &specs)
}
