// Loading the pitch-tracking CSV export into an immutable working dataset.
//
// Load order: header check, row deserialization, derived fields. Any failure
// aborts the load; a partially parsed file is never returned.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::derived::apply_derived_fields;
use crate::error::CoreError;
use crate::pitch::{PitchRecord, PitchType};
use crate::schema::check_columns;

/// Date layouts seen in tracker exports, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPitchRow {
    Date: String,
    Athlete_Name: String,
    MPH: f64,
    Spin_Direction: f64,
    Gyro_Degree: f64,
    Vertical_Break_Inches: f64,
    Horizontal_Break_Inches: f64,
    Total_Spin: f64,
    Spin_Efficiency: f64,
    True_Spin: f64,
    Release_Angle: f64,
    Release_Height: f64,
    Horizontal_Angle: f64,
    Release_Size: f64,
    Pitch_Count: f64,
    Pitch_Type: String,
    Strike: String,
    pitch_horizontal_offset: f64,
    pitch_vertical_offset: f64,
}

impl RawPitchRow {
    fn into_record(self, row: usize) -> Result<PitchRecord, CoreError> {
        let numeric = [
            ("MPH", self.MPH),
            ("Spin_Direction", self.Spin_Direction),
            ("Gyro_Degree", self.Gyro_Degree),
            ("Vertical_Break_Inches", self.Vertical_Break_Inches),
            ("Horizontal_Break_Inches", self.Horizontal_Break_Inches),
            ("Total_Spin", self.Total_Spin),
            ("Spin_Efficiency", self.Spin_Efficiency),
            ("True_Spin", self.True_Spin),
            ("Release_Angle", self.Release_Angle),
            ("Release_Height", self.Release_Height),
            ("Horizontal_Angle", self.Horizontal_Angle),
            ("Release_Size", self.Release_Size),
            ("Pitch_Count", self.Pitch_Count),
            ("pitch_horizontal_offset", self.pitch_horizontal_offset),
            ("pitch_vertical_offset", self.pitch_vertical_offset),
        ];
        if let Some((column, value)) = numeric.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CoreError::InvalidValue {
                row,
                column: column.to_string(),
                value: value.to_string(),
            });
        }

        // Some exports write counts as floats; only whole numbers are counts.
        if self.Pitch_Count.fract() != 0.0 {
            return Err(CoreError::InvalidValue {
                row,
                column: "Pitch_Count".into(),
                value: self.Pitch_Count.to_string(),
            });
        }

        let date = parse_date(&self.Date).ok_or_else(|| CoreError::InvalidValue {
            row,
            column: "Date".into(),
            value: self.Date.clone(),
        })?;
        let strike = parse_strike(&self.Strike).ok_or_else(|| CoreError::InvalidValue {
            row,
            column: "Strike".into(),
            value: self.Strike.clone(),
        })?;

        Ok(PitchRecord {
            date,
            athlete_name: self.Athlete_Name.trim().to_string(),
            pitch_type: self.Pitch_Type.trim().to_string(),
            mph: self.MPH,
            spin_direction: self.Spin_Direction,
            gyro_degree: self.Gyro_Degree,
            vertical_break_inches: self.Vertical_Break_Inches,
            horizontal_break_inches: self.Horizontal_Break_Inches,
            total_spin: self.Total_Spin,
            spin_efficiency: self.Spin_Efficiency,
            true_spin: self.True_Spin,
            release_angle: self.Release_Angle,
            release_height: self.Release_Height,
            horizontal_angle: self.Horizontal_Angle,
            release_size: self.Release_Size,
            pitch_count: self.Pitch_Count as i64,
            strike,
            pitch_horizontal_offset: self.pitch_horizontal_offset,
            pitch_vertical_offset: self.pitch_vertical_offset,
            pitch_start_x: 0.0,
            pitch_start_y: 0.0,
        })
    }
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parse a session date in any of the accepted export layouts.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Strike flags arrive as 0/1 or as words depending on the export version.
pub fn parse_strike(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" | "y" => Some(true),
        "0" | "0.0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The validated working table. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<PitchRecord>,
}

impl Dataset {
    /// Wrap already-parsed records, (re)computing their derived fields.
    pub fn new(mut records: Vec<PitchRecord>) -> Self {
        apply_derived_fields(&mut records);
        Dataset { records }
    }

    /// Load and validate a CSV file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let file = std::fs::File::open(path).map_err(|e| CoreError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let dataset = Self::from_reader(file)?;
        info!(
            "Loaded {} pitches from {} ({} athletes, pitch types: {:?})",
            dataset.len(),
            path.display(),
            dataset.athletes().len(),
            dataset.pitch_types()
        );
        Ok(dataset)
    }

    /// Load and validate CSV data from any reader.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, CoreError> {
        // Cells are trimmed; header names must match exactly.
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Fields)
            .from_reader(rdr);

        let headers = reader.headers()?.clone();
        let columns: Vec<&str> = headers.iter().collect();
        check_columns(&columns)?;

        let mut records = Vec::new();
        for (idx, result) in reader.deserialize::<RawPitchRow>().enumerate() {
            let raw = result?;
            records.push(raw.into_record(idx + 1)?);
        }

        let dataset = Dataset::new(records);
        for label in dataset.unknown_pitch_types() {
            warn!("pitch type '{}' has no palette colour and cannot be plotted", label);
        }
        Ok(dataset)
    }

    pub fn records(&self) -> &[PitchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct pitch type labels present in the data, sorted.
    pub fn pitch_types(&self) -> Vec<String> {
        self.distinct(|r| r.pitch_type.clone())
    }

    /// Distinct athlete names, sorted.
    pub fn athletes(&self) -> Vec<String> {
        self.distinct(|r| r.athlete_name.clone())
    }

    /// Distinct session dates, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.distinct(|r| r.date)
    }

    /// Labels present in the data that are outside the palette.
    pub fn unknown_pitch_types(&self) -> Vec<String> {
        self.pitch_types()
            .into_iter()
            .filter(|label| PitchType::from_name(label).is_err())
            .collect()
    }

    fn distinct<T: Ord, F: Fn(&PitchRecord) -> T>(&self, f: F) -> Vec<T> {
        self.records
            .iter()
            .map(f)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
