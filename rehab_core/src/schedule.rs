//! Per-phase evening schedule and date classification.
//!
//! Only the evening strength session is scheduled. Phase 1 has no schedule,
//! so every day is a workout day there.

use crate::types::*;
use crate::{Catalog, Error, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::path::Path;

static DEFAULT_SCHEDULE: Lazy<ScheduleTable> = Lazy::new(build_default_schedule);

/// Get a reference to the cached default schedule table
pub fn get_default_schedule() -> &'static ScheduleTable {
    &DEFAULT_SCHEDULE
}

/// Builds the default schedule table
///
/// Phases 2 and 3 rest on Sunday and Wednesday. Monday, Thursday and Friday
/// additionally bring back a reduced set of phase 1 exercises.
pub fn build_default_schedule() -> ScheduleTable {
    let mut overrides = BTreeMap::new();
    overrides.insert(
        "hip_flexor_warmup".to_string(),
        ExercisePatch {
            sets: Some(1),
            ..Default::default()
        },
    );
    overrides.insert(
        "clamshells".to_string(),
        ExercisePatch {
            sets: Some(2),
            ..Default::default()
        },
    );
    overrides.insert(
        "plank".to_string(),
        ExercisePatch {
            sets: Some(2),
            ..Default::default()
        },
    );
    overrides.insert(
        "dead_bug_holds".to_string(),
        ExercisePatch {
            sets: Some(2),
            target_reps: Some("5 each side, 10-15 sec holds".into()),
            left_target: Some(5),
            right_target: Some(5),
            ..Default::default()
        },
    );

    let config = ScheduleConfig {
        rest_days: vec![Weekday::Sun, Weekday::Wed],
        workout_days: vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ],
        maintenance_days: vec![Weekday::Mon, Weekday::Thu, Weekday::Fri],
        maintained_exercises: vec![
            "hip_flexor_warmup".into(),
            "dead_bug_holds".into(),
            "clamshells".into(),
            "plank".into(),
            "decompression_cooldown".into(),
        ],
        maintenance_overrides: overrides,
    };

    ScheduleTable {
        phase2: Some(config.clone()),
        phase3: Some(config),
    }
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| Error::InvalidInput(format!("invalid date '{}': {}", date, e)))
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Classify a date against a phase's schedule
///
/// Without a schedule every day is a workout day. Rest takes precedence when a
/// weekday is listed as both rest and workout, and a maintenance day must also
/// be a workout day.
pub fn classify(date: NaiveDate, schedule: Option<&ScheduleConfig>) -> Classification {
    let weekday = date.weekday();

    let (is_rest_day, is_workout_day, is_maintenance_day) = match schedule {
        None => (false, true, false),
        Some(config) => {
            let is_rest = config.rest_days.contains(&weekday);
            let is_workout = !is_rest && config.workout_days.contains(&weekday);
            let is_maintenance = is_workout && config.maintenance_days.contains(&weekday);
            (is_rest, is_workout, is_maintenance)
        }
    };

    Classification {
        date,
        is_rest_day,
        is_workout_day,
        is_maintenance_day,
        day_of_week: weekday.num_days_from_sunday(),
        day_name: day_name(weekday),
    }
}

/// Classify an ISO date string
pub fn classify_str(date: &str, schedule: Option<&ScheduleConfig>) -> Result<Classification> {
    Ok(classify(parse_date(date)?, schedule))
}

impl ScheduleTable {
    /// Schedule for a phase; phase 1 never has one
    pub fn for_phase(&self, phase: Phase) -> Option<&ScheduleConfig> {
        match phase {
            Phase::One => None,
            Phase::Two => self.phase2.as_ref(),
            Phase::Three => self.phase3.as_ref(),
        }
    }

    /// Load a schedule table from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table: ScheduleTable = toml::from_str(&contents)?;
        tracing::info!("Loaded schedule table from {:?}", path);
        Ok(table)
    }

    /// Validate and return the table, or fail with every problem found
    pub fn validated(self, catalog: &Catalog) -> Result<Self> {
        let errors = self.validate(catalog);
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(Error::ScheduleValidation(errors.join("; ")))
        }
    }

    /// Check the table against itself and the catalog it schedules
    pub fn validate(&self, catalog: &Catalog) -> Vec<String> {
        let mut errors = Vec::new();

        for phase in [Phase::Two, Phase::Three] {
            let Some(config) = self.for_phase(phase) else {
                continue;
            };

            for day in &config.rest_days {
                if config.workout_days.contains(day) {
                    errors.push(format!(
                        "Phase {}: {} is both a rest day and a workout day",
                        phase,
                        day_name(*day)
                    ));
                }
            }

            for day in &config.maintenance_days {
                if !config.workout_days.contains(day) {
                    errors.push(format!(
                        "Phase {}: maintenance day {} is not a workout day",
                        phase,
                        day_name(*day)
                    ));
                }
            }

            for id in &config.maintained_exercises {
                match catalog.phase_of(id) {
                    Some(Phase::One) => {}
                    Some(other) => errors.push(format!(
                        "Phase {}: maintained exercise '{}' belongs to phase {}, not phase 1",
                        phase, id, other
                    )),
                    None => errors.push(format!(
                        "Phase {}: maintained exercise '{}' is not in the catalog",
                        phase, id
                    )),
                }
            }

            for id in config.maintenance_overrides.keys() {
                if !config.maintained_exercises.contains(id) {
                    errors.push(format!(
                        "Phase {}: override for '{}' which is not maintained",
                        phase, id
                    ));
                }
            }
        }

        errors
    }
}
