// Fixed column layout of the pitch-tracking export.

use crate::error::CoreError;

/// The 19 columns every input file must carry, in this exact order.
pub const PITCH_COLUMNS: [&str; 19] = [
    "Date",
    "Athlete_Name",
    "MPH",
    "Spin_Direction",
    "Gyro_Degree",
    "Vertical_Break_Inches",
    "Horizontal_Break_Inches",
    "Total_Spin",
    "Spin_Efficiency",
    "True_Spin",
    "Release_Angle",
    "Release_Height",
    "Horizontal_Angle",
    "Release_Size",
    "Pitch_Count",
    "Pitch_Type",
    "Strike",
    "pitch_horizontal_offset",
    "pitch_vertical_offset",
];

/// Columns computed after load.
pub const DERIVED_COLUMNS: [&str; 2] = ["pitch_start_y", "pitch_start_x"];

/// True iff `columns` equals [`PITCH_COLUMNS`] element for element.
pub fn validate_columns<S: AsRef<str>>(columns: &[S]) -> bool {
    columns.len() == PITCH_COLUMNS.len()
        && columns
            .iter()
            .zip(PITCH_COLUMNS.iter())
            .all(|(found, expected)| found.as_ref() == *expected)
}

/// Like [`validate_columns`] but reports where the header diverges.
pub fn check_columns<S: AsRef<str>>(columns: &[S]) -> Result<(), CoreError> {
    if validate_columns(columns) {
        return Ok(());
    }
    Err(CoreError::SchemaMismatch {
        found: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        detail: describe_mismatch(columns),
    })
}

fn describe_mismatch<S: AsRef<str>>(columns: &[S]) -> String {
    let first_difference = columns
        .iter()
        .zip(PITCH_COLUMNS.iter())
        .position(|(found, expected)| found.as_ref() != *expected);

    match first_difference {
        Some(i) => format!(
            "column {}: expected `{}`, found `{}`",
            i + 1,
            PITCH_COLUMNS[i],
            columns[i].as_ref()
        ),
        None => format!(
            "expected {} columns, found {}",
            PITCH_COLUMNS.len(),
            columns.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Vec<String> {
        PITCH_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn exact_header_passes() {
        assert!(validate_columns(&reference()));
        assert!(check_columns(&PITCH_COLUMNS).is_ok());
    }

    #[test]
    fn swapped_columns_fail() {
        let mut cols = reference();
        cols.swap(2, 3);
        assert!(!validate_columns(&cols));

        match check_columns(&cols).unwrap_err() {
            CoreError::SchemaMismatch { detail, found } => {
                assert!(detail.contains("column 3"), "detail was {detail}");
                assert_eq!(found[2], "Spin_Direction");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn extra_column_fails() {
        let mut cols = reference();
        cols.push("pitch_start_x".into());
        assert!(!validate_columns(&cols));
        let err = check_columns(&cols).unwrap_err();
        assert!(err.to_string().contains("expected 19 columns, found 20"));
    }

    #[test]
    fn missing_column_fails() {
        let mut cols = reference();
        cols.pop();
        assert!(!validate_columns(&cols));
    }

    #[test]
    fn renamed_column_fails() {
        let mut cols = reference();
        cols[0] = "date".into();
        assert!(!validate_columns(&cols));
    }

    #[test]
    fn empty_header_fails() {
        let cols: Vec<String> = Vec::new();
        assert!(!validate_columns(&cols));
    }
}
