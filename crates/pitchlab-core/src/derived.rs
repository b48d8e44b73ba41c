// Derived release-start coordinates.
//
// The two fields are stored on the record itself, so applying the calculation
// again overwrites them in place instead of adding another pair of columns.

use crate::pitch::PitchRecord;

/// `(pitch_start_x, pitch_start_y)` for the given offsets and breaks.
pub fn start_point(
    horizontal_offset: f64,
    horizontal_break: f64,
    vertical_offset: f64,
    vertical_break: f64,
) -> (f64, f64) {
    (
        horizontal_offset + horizontal_break,
        vertical_offset + vertical_break,
    )
}

impl PitchRecord {
    /// Recompute `pitch_start_x` / `pitch_start_y` from the source columns.
    pub fn apply_derived(&mut self) {
        let (x, y) = start_point(
            self.pitch_horizontal_offset,
            self.horizontal_break_inches,
            self.pitch_vertical_offset,
            self.vertical_break_inches,
        );
        self.pitch_start_x = x;
        self.pitch_start_y = y;
    }
}

/// Apply the derived-field calculation to every record. No rows are dropped.
pub fn apply_derived_fields(records: &mut [PitchRecord]) {
    for record in records.iter_mut() {
        record.apply_derived();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn start_point_adds_offset_and_break() {
        assert_eq!(start_point(1.5, -4.0, 2.0, 10.0), (-2.5, 12.0));
        assert_eq!(start_point(0.0, 0.0, 0.0, 0.0), (0.0, 0.0));
        assert_eq!(start_point(-3.0, -7.0, -1.0, -2.0), (-10.0, -3.0));
    }

    #[test]
    fn applies_to_every_row() {
        let mut rows = vec![
            record("2024-01-01", "A", "Slider", 85.0),
            record("2024-01-02", "B", "Cutter", 88.0),
        ];
        rows[0].pitch_horizontal_offset = 2.0;
        rows[0].horizontal_break_inches = -6.0;
        rows[0].pitch_vertical_offset = -1.0;
        rows[0].vertical_break_inches = 3.5;
        rows[1].pitch_horizontal_offset = -0.5;
        rows[1].horizontal_break_inches = 1.0;
        rows[1].pitch_vertical_offset = 0.0;
        rows[1].vertical_break_inches = 0.0;

        apply_derived_fields(&mut rows);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pitch_start_x, -4.0);
        assert_eq!(rows[0].pitch_start_y, 2.5);
        assert_eq!(rows[1].pitch_start_x, 0.5);
        assert_eq!(rows[1].pitch_start_y, 0.0);
    }

    #[test]
    fn reapplying_is_idempotent() {
        let mut rows = vec![record("2024-01-01", "A", "Slider", 85.0)];
        rows[0].pitch_horizontal_offset = 1.25;
        rows[0].horizontal_break_inches = 3.0;

        apply_derived_fields(&mut rows);
        let once = rows.clone();
        apply_derived_fields(&mut rows);

        assert_eq!(rows, once);
    }

    #[test]
    fn reapplying_after_edit_recomputes() {
        let mut rows = vec![record("2024-01-01", "A", "Slider", 85.0)];
        apply_derived_fields(&mut rows);
        rows[0].vertical_break_inches = 9.0;
        apply_derived_fields(&mut rows);
        assert_eq!(rows[0].pitch_start_y, rows[0].pitch_vertical_offset + 9.0);
    }
}
