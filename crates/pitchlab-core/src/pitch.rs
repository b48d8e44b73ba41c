// Pitch categories, the per-pitch record, and the numeric metric columns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Pitch type palette
// ---------------------------------------------------------------------------

/// The nine pitch categories the tracker reports. Each one has a fixed
/// plotting colour; any other label has no colour and cannot be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchType {
    FourSeamFastball,
    TwoSeamFastball,
    Cutter,
    Curveball,
    Slider,
    Changeup,
    Splitter,
    Knuckleball,
    Other,
}

impl PitchType {
    pub const ALL: [PitchType; 9] = [
        PitchType::FourSeamFastball,
        PitchType::TwoSeamFastball,
        PitchType::Cutter,
        PitchType::Curveball,
        PitchType::Slider,
        PitchType::Changeup,
        PitchType::Splitter,
        PitchType::Knuckleball,
        PitchType::Other,
    ];

    /// Look up a category by its data label (exact match).
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        PitchType::ALL
            .iter()
            .copied()
            .find(|p| p.name() == name)
            .ok_or_else(|| CoreError::UnknownCategory(name.to_string()))
    }

    /// The label used in the data file and in legends.
    pub fn name(&self) -> &'static str {
        match self {
            PitchType::FourSeamFastball => "4 Seam Fastball",
            PitchType::TwoSeamFastball => "2 Seam Fastball",
            PitchType::Cutter => "Cutter",
            PitchType::Curveball => "Curveball",
            PitchType::Slider => "Slider",
            PitchType::Changeup => "Changeup",
            PitchType::Splitter => "Splitter",
            PitchType::Knuckleball => "Knuckleball",
            PitchType::Other => "Other",
        }
    }

    /// Marker colour bound to this category.
    pub fn color(&self) -> &'static str {
        match self {
            PitchType::FourSeamFastball => "#636EFA",
            PitchType::TwoSeamFastball => "#EF553B",
            PitchType::Cutter => "#00CC96",
            PitchType::Curveball => "#AB63FA",
            PitchType::Slider => "#FFA15A",
            PitchType::Changeup => "#19D3F3",
            PitchType::Splitter => "#FF6692",
            PitchType::Knuckleball => "#B6E880",
            PitchType::Other => "#FF97FF",
        }
    }
}

impl fmt::Display for PitchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Pitch record
// ---------------------------------------------------------------------------

/// One tracked pitch. `pitch_type` keeps the raw label so that a file with an
/// unrecognised category can still be loaded; the view layer rejects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchRecord {
    pub date: NaiveDate,
    pub athlete_name: String,
    pub pitch_type: String,
    pub mph: f64,
    pub spin_direction: f64,
    pub gyro_degree: f64,
    pub vertical_break_inches: f64,
    pub horizontal_break_inches: f64,
    pub total_spin: f64,
    pub spin_efficiency: f64,
    pub true_spin: f64,
    pub release_angle: f64,
    pub release_height: f64,
    pub horizontal_angle: f64,
    pub release_size: f64,
    pub pitch_count: i64,
    pub strike: bool,
    pub pitch_horizontal_offset: f64,
    pub pitch_vertical_offset: f64,
    /// Derived: `pitch_horizontal_offset + horizontal_break_inches`.
    pub pitch_start_x: f64,
    /// Derived: `pitch_vertical_offset + vertical_break_inches`.
    pub pitch_start_y: f64,
}

// ---------------------------------------------------------------------------
// Numeric metrics
// ---------------------------------------------------------------------------

/// Every numeric column that can be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Mph,
    SpinDirection,
    GyroDegree,
    VerticalBreak,
    HorizontalBreak,
    TotalSpin,
    SpinEfficiency,
    TrueSpin,
    ReleaseAngle,
    ReleaseHeight,
    HorizontalAngle,
    ReleaseSize,
    PitchCount,
    HorizontalOffset,
    VerticalOffset,
    StartX,
    StartY,
}

impl Metric {
    pub const ALL: [Metric; 17] = [
        Metric::Mph,
        Metric::SpinDirection,
        Metric::GyroDegree,
        Metric::VerticalBreak,
        Metric::HorizontalBreak,
        Metric::TotalSpin,
        Metric::SpinEfficiency,
        Metric::TrueSpin,
        Metric::ReleaseAngle,
        Metric::ReleaseHeight,
        Metric::HorizontalAngle,
        Metric::ReleaseSize,
        Metric::PitchCount,
        Metric::HorizontalOffset,
        Metric::VerticalOffset,
        Metric::StartX,
        Metric::StartY,
    ];

    /// Column name as it appears in the working table.
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Mph => "MPH",
            Metric::SpinDirection => "Spin_Direction",
            Metric::GyroDegree => "Gyro_Degree",
            Metric::VerticalBreak => "Vertical_Break_Inches",
            Metric::HorizontalBreak => "Horizontal_Break_Inches",
            Metric::TotalSpin => "Total_Spin",
            Metric::SpinEfficiency => "Spin_Efficiency",
            Metric::TrueSpin => "True_Spin",
            Metric::ReleaseAngle => "Release_Angle",
            Metric::ReleaseHeight => "Release_Height",
            Metric::HorizontalAngle => "Horizontal_Angle",
            Metric::ReleaseSize => "Release_Size",
            Metric::PitchCount => "Pitch_Count",
            Metric::HorizontalOffset => "pitch_horizontal_offset",
            Metric::VerticalOffset => "pitch_vertical_offset",
            Metric::StartX => "pitch_start_x",
            Metric::StartY => "pitch_start_y",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Metric::ALL.iter().copied().find(|m| m.column_name() == name)
    }

    pub fn value(&self, record: &PitchRecord) -> f64 {
        match self {
            Metric::Mph => record.mph,
            Metric::SpinDirection => record.spin_direction,
            Metric::GyroDegree => record.gyro_degree,
            Metric::VerticalBreak => record.vertical_break_inches,
            Metric::HorizontalBreak => record.horizontal_break_inches,
            Metric::TotalSpin => record.total_spin,
            Metric::SpinEfficiency => record.spin_efficiency,
            Metric::TrueSpin => record.true_spin,
            Metric::ReleaseAngle => record.release_angle,
            Metric::ReleaseHeight => record.release_height,
            Metric::HorizontalAngle => record.horizontal_angle,
            Metric::ReleaseSize => record.release_size,
            Metric::PitchCount => record.pitch_count as f64,
            Metric::HorizontalOffset => record.pitch_horizontal_offset,
            Metric::VerticalOffset => record.pitch_vertical_offset,
            Metric::StartX => record.pitch_start_x,
            Metric::StartY => record.pitch_start_y,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_palette_name_round_trips() {
        for pitch in PitchType::ALL {
            assert_eq!(PitchType::from_name(pitch.name()).unwrap(), pitch);
        }
    }

    #[test]
    fn palette_colors_are_distinct() {
        let mut colors: Vec<&str> = PitchType::ALL.iter().map(|p| p.color()).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 9);
    }

    #[test]
    fn unknown_pitch_type_is_rejected() {
        match PitchType::from_name("Forkball") {
            Err(CoreError::UnknownCategory(name)) => assert_eq!(name, "Forkball"),
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }

    #[test]
    fn pitch_type_lookup_is_case_sensitive() {
        assert!(PitchType::from_name("slider").is_err());
        assert_eq!(PitchType::from_name("Slider").unwrap(), PitchType::Slider);
    }

    #[test]
    fn metric_column_lookup() {
        assert_eq!(Metric::from_column("MPH"), Some(Metric::Mph));
        assert_eq!(Metric::from_column("pitch_start_y"), Some(Metric::StartY));
        assert_eq!(Metric::from_column("Athlete_Name"), None);
    }
}
