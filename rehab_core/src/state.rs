//! Daily progress persistence with file locking.
//!
//! Today's record is replaced, never merged, when a new day begins. The
//! previous day is folded into the workout history first.

use crate::history::{record_from_progress, HistorySink};
use crate::{Catalog, DailyProgress, Error, ExerciseLog, Phase, Result, WorkoutRecord};
use chrono::NaiveDate;
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Highest value on the pain scale
pub const PAIN_MAX: u8 = 10;

impl DailyProgress {
    /// A blank record for the given day
    pub fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            completed_exercises: Vec::new(),
            exercise_data: BTreeMap::new(),
            sound_enabled: true,
            phase: None,
        }
    }

    /// Read whatever record is stored, without any date check
    ///
    /// Returns `None` if the file doesn't exist. If the file is unreadable or
    /// corrupted, logs a warning and returns `None`.
    pub fn load_stored(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::info!("No progress file found at {:?}", path);
            return Ok(None);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open progress file {:?}: {}. Starting fresh.", path, e);
                return Ok(None);
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock progress file {:?}: {}. Starting fresh.", path, e);
            return Ok(None);
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read progress file {:?}: {}. Starting fresh.", path, e);
            return Ok(None);
        }

        file.unlock()?;

        match serde_json::from_str::<DailyProgress>(&contents) {
            Ok(progress) => {
                tracing::debug!("Loaded progress for {} from {:?}", progress.date, path);
                Ok(Some(progress))
            }
            Err(e) => {
                tracing::warn!("Failed to parse progress file {:?}: {}. Starting fresh.", path, e);
                Ok(None)
            }
        }
    }

    /// Load today's progress
    ///
    /// A stored record from any other day is ignored and a fresh one returned.
    pub fn load_for(path: &Path, today: NaiveDate) -> Result<Self> {
        match Self::load_stored(path)? {
            Some(progress) if progress.date == today => Ok(progress),
            _ => Ok(Self::fresh(today)),
        }
    }

    /// Save progress to a file with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "progress path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved progress for {} to {:?}", self.date, path);
        Ok(())
    }

    /// Start the day: fold an earlier stored day into history, return today's record
    ///
    /// When the stored record already belongs to `today` it is returned as is.
    /// When it belongs to an earlier day, any completed work is appended to
    /// `history` under the phase that day was started in, and a fresh record
    /// for `today` is saved in its place. A stored record from a later day is
    /// never replaced; asking for an earlier day fails with
    /// `Error::InvalidInput` and leaves the file untouched.
    pub fn roll_over(
        path: &Path,
        history: &mut dyn HistorySink,
        catalog: &Catalog,
        phase: Phase,
        today: NaiveDate,
    ) -> Result<(Self, Option<WorkoutRecord>)> {
        let stored = Self::load_stored(path)?;

        let previous = match stored {
            Some(progress) if progress.date == today => return Ok((progress, None)),
            Some(progress) if progress.date > today => {
                return Err(Error::InvalidInput(format!(
                    "cannot start {} while {} is in progress",
                    today, progress.date
                )));
            }
            Some(progress) => progress,
            None => {
                let fresh = Self {
                    phase: Some(phase),
                    ..Self::fresh(today)
                };
                fresh.save(path)?;
                return Ok((fresh, None));
            }
        };

        let record = record_from_progress(&previous, catalog, previous.phase.unwrap_or(phase));
        if let Some(ref record) = record {
            history.append(record)?;
            tracing::info!(
                "Archived {} exercises from {} into history",
                record.exercises.len(),
                previous.date
            );
        }

        let fresh = Self {
            sound_enabled: previous.sound_enabled,
            phase: Some(phase),
            ..Self::fresh(today)
        };
        fresh.save(path)?;
        Ok((fresh, record))
    }

    /// Share of the phase's cumulative exercise list completed today, 0..=100
    pub fn completion_percent(&self, catalog: &Catalog, phase: Phase) -> u32 {
        let total = catalog.exercises_for_phase(phase).len();
        if total == 0 {
            return 0;
        }
        let done = self.completed_exercises.len().min(total);
        ((done as f64 / total as f64) * 100.0).round() as u32
    }

    /// Record an exercise as done with the values logged for it
    pub fn mark_complete(&mut self, id: &str, log: ExerciseLog) -> Result<()> {
        if log.pain > PAIN_MAX {
            return Err(Error::InvalidInput(format!(
                "pain level {} is outside 0..={}",
                log.pain, PAIN_MAX
            )));
        }

        if !self.is_complete(id) {
            self.completed_exercises.push(id.to_string());
        }
        self.exercise_data.insert(id.to_string(), log);
        Ok(())
    }

    /// Undo a completion; logged values are kept for re-editing
    pub fn unmark(&mut self, id: &str) -> bool {
        let before = self.completed_exercises.len();
        self.completed_exercises.retain(|done| done != id);
        before != self.completed_exercises.len()
    }

    pub fn is_complete(&self, id: &str) -> bool {
        self.completed_exercises.iter().any(|done| done == id)
    }

    /// Average pain across completed exercises
    pub fn average_pain(&self) -> f32 {
        let pains: Vec<u8> = self
            .completed_exercises
            .iter()
            .filter_map(|id| self.exercise_data.get(id).map(|log| log.pain))
            .collect();
        if pains.is_empty() {
            return 0.0;
        }
        pains.iter().map(|p| *p as f32).sum::<f32>() / pains.len() as f32
    }
}
