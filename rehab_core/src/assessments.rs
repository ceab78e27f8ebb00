//! Weekly and monthly assessments.
//!
//! Each kind is kept in its own append-only JSONL file next to the workout
//! history.

use crate::jsonl;
use crate::state::PAIN_MAX;
use crate::{Error, MonthlyAssessment, Result, WeeklyAssessment};
use std::path::Path;

/// Month number a program week falls in (weeks 1-4 are month 1)
pub fn month_for_week(week: u32) -> u32 {
    week.max(1).div_ceil(4)
}

fn check_pain(area: &str, value: u8) -> Result<()> {
    if value > PAIN_MAX {
        return Err(Error::InvalidInput(format!(
            "{} pain {} is outside 0..={}",
            area, value, PAIN_MAX
        )));
    }
    Ok(())
}

fn check_girth(name: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(cm) if !cm.is_finite() || cm <= 0.0 => Err(Error::InvalidInput(format!(
            "{} measurement {} must be a positive number of cm",
            name, cm
        ))),
        _ => Ok(()),
    }
}

/// Append a weekly assessment after checking its pain scores
pub fn save_weekly(path: &Path, assessment: &WeeklyAssessment) -> Result<()> {
    check_pain("knee", assessment.knee_pain)?;
    check_pain("back", assessment.back_pain)?;
    check_pain("foot", assessment.foot_pain)?;
    if assessment.week == 0 {
        return Err(Error::InvalidInput("week numbers start at 1".into()));
    }

    jsonl::append(path, assessment)?;
    tracing::info!("Saved weekly assessment for week {}", assessment.week);
    Ok(())
}

/// Append a monthly assessment after checking its measurements
pub fn save_monthly(path: &Path, assessment: &MonthlyAssessment) -> Result<()> {
    if assessment.month == 0 {
        return Err(Error::InvalidInput("month numbers start at 1".into()));
    }
    check_girth("calf right", assessment.calf_right)?;
    check_girth("calf left", assessment.calf_left)?;
    check_girth("thigh right", assessment.thigh_right)?;
    check_girth("thigh left", assessment.thigh_left)?;

    jsonl::append(path, assessment)?;
    tracing::info!("Saved monthly assessment for month {}", assessment.month);
    Ok(())
}

/// Weekly assessments in the order they were saved
pub fn read_weekly(path: &Path) -> Result<Vec<WeeklyAssessment>> {
    jsonl::read_all(path)
}

/// Monthly assessments in the order they were saved
pub fn read_monthly(path: &Path) -> Result<Vec<MonthlyAssessment>> {
    jsonl::read_all(path)
}

/// The most recently saved assessment, shown as reference when entering a new one
pub fn previous<T>(saved: &[T]) -> Option<&T> {
    saved.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Phase;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn weekly(week: u32, stand_left: Option<u32>) -> WeeklyAssessment {
        WeeklyAssessment {
            id: Uuid::new_v4(),
            week,
            date: NaiveDate::from_ymd_opt(2025, 6, 8 + week).unwrap(),
            stand_left,
            stand_right: Some(30),
            bridge_left: Some(8),
            bridge_right: Some(12),
            reach_left: None,
            reach_right: None,
            knee_pain: 2,
            back_pain: 1,
            foot_pain: 0,
            notes: String::new(),
            recorded_at: Utc::now(),
        }
    }

    fn monthly(month: u32) -> MonthlyAssessment {
        MonthlyAssessment {
            id: Uuid::new_v4(),
            month,
            date: NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
            calf_right: Some(37.5),
            calf_left: Some(36.0),
            thigh_right: None,
            thigh_left: None,
            photos_taken: true,
            video_taken: false,
            phase: Phase::One,
            ready_next_phase: false,
            notes: "left calf still smaller".into(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_month_for_week() {
        assert_eq!(month_for_week(0), 1);
        assert_eq!(month_for_week(1), 1);
        assert_eq!(month_for_week(4), 1);
        assert_eq!(month_for_week(5), 2);
        assert_eq!(month_for_week(9), 3);
    }

    #[test]
    fn test_weekly_save_and_previous() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("weekly.jsonl");
        assert!(previous(&read_weekly(&path).unwrap()).is_none());

        save_weekly(&path, &weekly(1, Some(12))).unwrap();
        save_weekly(&path, &weekly(2, Some(18))).unwrap();

        let saved = read_weekly(&path).unwrap();
        assert_eq!(saved.len(), 2);
        let last = previous(&saved).unwrap();
        assert_eq!(last.week, 2);
        assert_eq!(last.stand_left, Some(18));
    }

    #[test]
    fn test_weekly_pain_out_of_range_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("weekly.jsonl");

        let mut bad = weekly(1, None);
        bad.back_pain = 11;
        assert!(matches!(save_weekly(&path, &bad), Err(Error::InvalidInput(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_monthly_save_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("monthly.jsonl");

        save_monthly(&path, &monthly(1)).unwrap();
        save_monthly(&path, &monthly(2)).unwrap();

        let saved = read_monthly(&path).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(previous(&saved).unwrap().month, 2);
        assert_eq!(saved[0].calf_right, Some(37.5));
    }

    #[test]
    fn test_monthly_bad_measurement_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("monthly.jsonl");

        let mut bad = monthly(1);
        bad.thigh_left = Some(-3.0);
        assert!(matches!(save_monthly(&path, &bad), Err(Error::InvalidInput(_))));

        let mut zero = monthly(1);
        zero.month = 0;
        assert!(save_monthly(&path, &zero).is_err());
    }
}
