// Selection filter: restrict rows to the allowed pitch types and split them
// around a highlighted (date, pitch type) pair.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::pitch::PitchRecord;

/// Identifies the highlighted subset. `athlete_name` travels with the key for
/// display but never takes part in matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionKey {
    pub date: NaiveDate,
    pub pitch_type: String,
    #[serde(default)]
    pub athlete_name: String,
}

impl SelectionKey {
    pub fn new(date: NaiveDate, pitch_type: impl Into<String>) -> Self {
        SelectionKey {
            date,
            pitch_type: pitch_type.into(),
            athlete_name: String::new(),
        }
    }

    pub fn with_athlete(mut self, athlete_name: impl Into<String>) -> Self {
        self.athlete_name = athlete_name.into();
        self
    }

    pub fn matches(&self, record: &PitchRecord) -> bool {
        record.date == self.date && record.pitch_type == self.pitch_type
    }
}

/// How strongly a layer of points is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Full,
    Dimmed,
}

/// Result of [`partition`].
#[derive(Debug, Clone, PartialEq)]
pub enum Partition<'a> {
    /// No selection: every allowed row at full emphasis.
    All(Vec<&'a PitchRecord>),
    /// A selection split the allowed rows in two.
    Highlighted {
        matches: Vec<&'a PitchRecord>,
        others: Vec<&'a PitchRecord>,
    },
}

impl<'a> Partition<'a> {
    /// Layers in drawing order, each with its emphasis.
    pub fn layers(&self) -> Vec<(Emphasis, &[&'a PitchRecord])> {
        match self {
            Partition::All(rows) => vec![(Emphasis::Full, rows.as_slice())],
            Partition::Highlighted { matches, others } => vec![
                (Emphasis::Full, matches.as_slice()),
                (Emphasis::Dimmed, others.as_slice()),
            ],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Partition::All(rows) => rows.len(),
            Partition::Highlighted { matches, others } => matches.len() + others.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rows whose pitch type is in `allowed`. An empty allow-list selects nothing.
pub fn filter_allowed<'a, S: AsRef<str>>(
    rows: &'a [PitchRecord],
    allowed: &[S],
) -> Vec<&'a PitchRecord> {
    let allowed: HashSet<&str> = allowed.iter().map(|s| s.as_ref()).collect();
    rows.iter()
        .filter(|r| allowed.contains(r.pitch_type.as_str()))
        .collect()
}

/// Filter to `allowed`, then split around `selection` if one is given.
///
/// Every allowed row lands in exactly one of `matches` / `others`.
pub fn partition<'a, S: AsRef<str>>(
    rows: &'a [PitchRecord],
    allowed: &[S],
    selection: Option<&SelectionKey>,
) -> Partition<'a> {
    let filtered = filter_allowed(rows, allowed);
    match selection {
        None => Partition::All(filtered),
        Some(key) => {
            let (matches, others) = filtered.into_iter().partition(|r| key.matches(r));
            Partition::Highlighted { matches, others }
        }
    }
}

/// Every allowed pitch thrown on `date`, regardless of pitch type.
pub fn session_pitches<'a, S: AsRef<str>>(
    rows: &'a [PitchRecord],
    allowed: &[S],
    date: NaiveDate,
) -> Vec<&'a PitchRecord> {
    filter_allowed(rows, allowed)
        .into_iter()
        .filter(|r| r.date == date)
        .collect()
}
