//! CSV export of workouts and assessments.
//!
//! Workouts export one row per completed exercise; assessments one row
//! per saved assessment.

use crate::{MonthlyAssessment, Result, WeeklyAssessment, WorkoutRecord};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    date: String,
    phase: u8,
    exercise: &'a str,
    left: u32,
    right: u32,
    sets: u32,
    pain: u8,
    notes: &'a str,
}

const WORKOUT_HEADERS: [&str; 8] = [
    "Date",
    "Phase",
    "Exercise",
    "Left Reps",
    "Right Reps",
    "Sets",
    "Pain Level",
    "Notes",
];

const WEEKLY_HEADERS: [&str; 12] = [
    "Week",
    "Date",
    "Stand Left",
    "Stand Right",
    "Bridge Left",
    "Bridge Right",
    "Reach Left",
    "Reach Right",
    "Knee Pain",
    "Back Pain",
    "Foot Pain",
    "Notes",
];

const MONTHLY_HEADERS: [&str; 11] = [
    "Month",
    "Date",
    "Calf Right",
    "Calf Left",
    "Thigh Right",
    "Thigh Left",
    "Photos",
    "Video",
    "Phase",
    "Ready Next Phase",
    "Notes",
];

/// Weekly assessment row
#[derive(Debug, serde::Serialize)]
struct WeeklyRow<'a> {
    week: u32,
    date: String,
    stand_left: Option<u32>,
    stand_right: Option<u32>,
    bridge_left: Option<u32>,
    bridge_right: Option<u32>,
    reach_left: Option<u32>,
    reach_right: Option<u32>,
    knee_pain: u8,
    back_pain: u8,
    foot_pain: u8,
    notes: &'a str,
}

/// Monthly assessment row
#[derive(Debug, serde::Serialize)]
struct MonthlyRow<'a> {
    month: u32,
    date: String,
    calf_right: Option<f64>,
    calf_left: Option<f64>,
    thigh_right: Option<f64>,
    thigh_left: Option<f64>,
    photos: bool,
    video: bool,
    phase: u8,
    ready_next_phase: bool,
    notes: &'a str,
}

/// Write `headers` then one record per row; overwrites the target
fn write_rows<R, I>(path: &Path, headers: &[&str], rows: I) -> Result<usize>
where
    R: serde::Serialize,
    I: IntoIterator<Item = R>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(headers)?;

    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }

    writer.flush()?;
    tracing::info!("Exported {} rows to {:?}", count, path);
    Ok(count)
}

/// Write every workout record to a CSV file
///
/// Overwrites the target. Returns the number of exercise rows written.
pub fn export_workouts_csv(records: &[WorkoutRecord], path: &Path) -> Result<usize> {
    let rows = records.iter().flat_map(|record| {
        record.exercises.iter().map(move |ex| CsvRow {
            date: record.date.format("%Y-%m-%d").to_string(),
            phase: record.phase.number(),
            exercise: &ex.name,
            left: ex.left,
            right: ex.right,
            sets: ex.sets,
            pain: ex.pain,
            notes: &ex.notes,
        })
    });
    write_rows(path, &WORKOUT_HEADERS, rows)
}

/// Write weekly assessments to a CSV file; skipped measurements are blank
pub fn export_weekly_csv(assessments: &[WeeklyAssessment], path: &Path) -> Result<usize> {
    let rows = assessments.iter().map(|a| WeeklyRow {
        week: a.week,
        date: a.date.format("%Y-%m-%d").to_string(),
        stand_left: a.stand_left,
        stand_right: a.stand_right,
        bridge_left: a.bridge_left,
        bridge_right: a.bridge_right,
        reach_left: a.reach_left,
        reach_right: a.reach_right,
        knee_pain: a.knee_pain,
        back_pain: a.back_pain,
        foot_pain: a.foot_pain,
        notes: &a.notes,
    });
    write_rows(path, &WEEKLY_HEADERS, rows)
}

/// Write monthly assessments to a CSV file
pub fn export_monthly_csv(assessments: &[MonthlyAssessment], path: &Path) -> Result<usize> {
    let rows = assessments.iter().map(|a| MonthlyRow {
        month: a.month,
        date: a.date.format("%Y-%m-%d").to_string(),
        calf_right: a.calf_right,
        calf_left: a.calf_left,
        thigh_right: a.thigh_right,
        thigh_left: a.thigh_left,
        photos: a.photos_taken,
        video: a.video_taken,
        phase: a.phase.number(),
        ready_next_phase: a.ready_next_phase,
        notes: &a.notes,
    });
    write_rows(path, &MONTHLY_HEADERS, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompletedExercise, Phase};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn record(day: u32, notes: &str) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            phase: Phase::Two,
            exercises: vec![
                CompletedExercise {
                    id: "step_ups".into(),
                    name: "Step-Ups".into(),
                    left: 12,
                    right: 18,
                    sets: 3,
                    pain: 2,
                    notes: notes.into(),
                },
                CompletedExercise {
                    id: "pallof_press".into(),
                    name: "Pallof Press".into(),
                    left: 12,
                    right: 12,
                    sets: 3,
                    pain: 0,
                    notes: String::new(),
                },
            ],
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.csv");

        let rows = export_workouts_csv(&[record(9, ""), record(10, "")], &path).unwrap();
        assert_eq!(rows, 4);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["Date", "Phase", "Exercise", "Left Reps", "Right Reps", "Sets", "Pain Level", "Notes"]
        );
        let first = reader.records().next().unwrap().unwrap();
        assert_eq!(&first[0], "2025-06-09");
        assert_eq!(&first[1], "2");
        assert_eq!(&first[2], "Step-Ups");
    }

    #[test]
    fn test_notes_with_commas_and_quotes_survive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.csv");
        let notes = r#"knee ached, "sharp" at top"#;

        export_workouts_csv(&[record(9, notes)], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let first = reader.records().next().unwrap().unwrap();
        assert_eq!(&first[7], notes);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn test_weekly_blank_measurements() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("weekly.csv");
        let assessment = WeeklyAssessment {
            id: Uuid::new_v4(),
            week: 3,
            date: NaiveDate::from_ymd_opt(2025, 6, 22).unwrap(),
            stand_left: Some(25),
            stand_right: Some(40),
            bridge_left: None,
            bridge_right: None,
            reach_left: None,
            reach_right: Some(12),
            knee_pain: 3,
            back_pain: 1,
            foot_pain: 0,
            notes: "windy, outdoors".into(),
            recorded_at: Utc::now(),
        };

        assert_eq!(export_weekly_csv(&[assessment], &path).unwrap(), 1);

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Week,Date,Stand Left,Stand Right,Bridge Left,Bridge Right,Reach Left,Reach Right,Knee Pain,Back Pain,Foot Pain,Notes"
        );
        assert_eq!(
            lines.next().unwrap(),
            "3,2025-06-22,25,40,,,,12,3,1,0,\"windy, outdoors\""
        );
    }

    #[test]
    fn test_monthly_export() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("monthly.csv");
        let assessment = MonthlyAssessment {
            id: Uuid::new_v4(),
            month: 2,
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            calf_right: Some(37.5),
            calf_left: Some(36.0),
            thigh_right: None,
            thigh_left: None,
            photos_taken: true,
            video_taken: false,
            phase: Phase::Two,
            ready_next_phase: true,
            notes: String::new(),
            recorded_at: Utc::now(),
        };

        assert_eq!(export_monthly_csv(&[assessment], &path).unwrap(), 1);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(&reader.headers().unwrap()[9], "Ready Next Phase");
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "2");
        assert_eq!(&row[2], "37.5");
        assert_eq!(&row[4], "");
        assert_eq!(&row[6], "true");
        assert_eq!(&row[8], "2");
    }

    #[test]
    fn test_empty_history_writes_header_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.csv");

        let rows = export_workouts_csv(&[], &path).unwrap();
        assert_eq!(rows, 0);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Date,Phase,Exercise"));
        assert_eq!(contents.lines().count(), 1);
    }
}
