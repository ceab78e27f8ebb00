//! Append-only workout history.
//!
//! Finished days are appended to a JSONL (JSON Lines) file with file locking.
//! Records are never rewritten.

use crate::jsonl;
use crate::{Catalog, CompletedExercise, DailyProgress, Phase, Result, WorkoutRecord};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// History sink trait for persisting finished workouts
pub trait HistorySink {
    fn append(&mut self, record: &WorkoutRecord) -> Result<()>;
}

/// JSONL-based history sink with file locking
pub struct JsonlHistory {
    path: PathBuf,
}

impl JsonlHistory {
    /// Create a new JSONL history for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySink for JsonlHistory {
    fn append(&mut self, record: &WorkoutRecord) -> Result<()> {
        jsonl::append(&self.path, record)?;
        tracing::debug!("Appended workout {} for {} to history", record.id, record.date);
        Ok(())
    }
}

/// Read all workout records from a history file, oldest first
///
/// Corrupt lines are skipped with a warning.
pub fn read_records(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let mut records: Vec<WorkoutRecord> = jsonl::read_all(path)?;
    records.sort_by_key(|r| r.date);
    tracing::debug!("Read {} workouts from history", records.len());
    Ok(records)
}

/// Fold a finished day's progress into a history record
///
/// Returns `None` when nothing was completed that day. Exercise names are
/// taken from the catalog; ids no longer in the catalog keep their id as name.
pub fn record_from_progress(
    progress: &DailyProgress,
    catalog: &Catalog,
    phase: Phase,
) -> Option<WorkoutRecord> {
    if progress.completed_exercises.is_empty() {
        return None;
    }

    let exercises = progress
        .completed_exercises
        .iter()
        .map(|id| {
            let log = progress.exercise_data.get(id).cloned().unwrap_or_default();
            let name = catalog
                .find(id)
                .map(|ex| ex.name.clone())
                .unwrap_or_else(|| id.clone());
            CompletedExercise {
                id: id.clone(),
                name,
                left: log.left,
                right: log.right,
                sets: log.sets,
                pain: log.pain,
                notes: log.notes,
            }
        })
        .collect();

    Some(WorkoutRecord {
        id: Uuid::new_v4(),
        date: progress.date,
        phase,
        exercises,
        recorded_at: Utc::now(),
    })
}

/// 1-based program week, counted from the earliest recorded workout
pub fn current_week(records: &[WorkoutRecord], today: NaiveDate) -> u32 {
    let Some(first) = records.iter().map(|r| r.date).min() else {
        return 1;
    };
    let days = (today - first).num_days().max(0);
    (days / 7) as u32 + 1
}

/// Average pain across a workout's exercises
pub fn average_pain(record: &WorkoutRecord) -> f32 {
    if record.exercises.is_empty() {
        return 0.0;
    }
    let total: u32 = record.exercises.iter().map(|ex| ex.pain as u32).sum();
    total as f32 / record.exercises.len() as f32
}
