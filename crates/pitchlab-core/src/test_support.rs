// Record builders shared by the unit tests.

use chrono::NaiveDate;

use crate::pitch::PitchRecord;

pub(crate) fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// A pitch with the given identity and velocity; every other measurement is
/// zero until the test sets it.
pub(crate) fn record(day: &str, athlete: &str, pitch_type: &str, mph: f64) -> PitchRecord {
    let mut rec = PitchRecord {
        date: date(day),
        athlete_name: athlete.to_string(),
        pitch_type: pitch_type.to_string(),
        mph,
        spin_direction: 0.0,
        gyro_degree: 0.0,
        vertical_break_inches: 0.0,
        horizontal_break_inches: 0.0,
        total_spin: 0.0,
        spin_efficiency: 0.0,
        true_spin: 0.0,
        release_angle: 0.0,
        release_height: 0.0,
        horizontal_angle: 0.0,
        release_size: 0.0,
        pitch_count: 1,
        strike: false,
        pitch_horizontal_offset: 0.0,
        pitch_vertical_offset: 0.0,
        pitch_start_x: 0.0,
        pitch_start_y: 0.0,
    };
    rec.apply_derived();
    rec
}

/// Same as [`record`] with explicit break values.
pub(crate) fn with_break(mut rec: PitchRecord, horizontal: f64, vertical: f64) -> PitchRecord {
    rec.horizontal_break_inches = horizontal;
    rec.vertical_break_inches = vertical;
    rec.apply_derived();
    rec
}
