//! Core domain types for the rehab tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Phases, time blocks and exercise definitions
//! - Per-phase schedule configuration and date classification
//! - Daily progress and the workout history record

use crate::Error;
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Phase and Time Block
// ============================================================================

/// A multi-week stage of the rehab program
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Phase {
    One,
    Two,
    Three,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::One, Phase::Two, Phase::Three];

    /// Map a phase number onto a phase.
    ///
    /// Anything outside 1..=3 falls back to phase 1.
    pub fn from_number(n: u8) -> Phase {
        match n {
            1 => Phase::One,
            2 => Phase::Two,
            3 => Phase::Three,
            other => {
                tracing::warn!("Unknown phase {}, falling back to phase 1", other);
                Phase::One
            }
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
            Phase::Three => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::One => "Phase 1: Foundation (Weeks 1-8)",
            Phase::Two => "Phase 2: Functional Strength (Weeks 9-20)",
            Phase::Three => "Phase 3: Advanced (Week 21+)",
        }
    }

    /// Phases whose exercises make up this phase's cumulative set, in order
    pub fn cumulative(self) -> impl Iterator<Item = Phase> {
        Phase::ALL.into_iter().filter(move |p| *p <= self)
    }
}

impl From<u8> for Phase {
    fn from(n: u8) -> Self {
        Phase::from_number(n)
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> Self {
        phase.number()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Scheduling bucket describing when in the day an exercise is intended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBlock {
    Morning,
    ThroughoutDay,
    Evening,
    BeforeBed,
    Bonus,
}

impl TimeBlock {
    /// All time blocks in display order
    pub const ALL: [TimeBlock; 5] = [
        TimeBlock::Morning,
        TimeBlock::ThroughoutDay,
        TimeBlock::Evening,
        TimeBlock::BeforeBed,
        TimeBlock::Bonus,
    ];

    pub fn order(self) -> u8 {
        match self {
            TimeBlock::Morning => 1,
            TimeBlock::ThroughoutDay => 2,
            TimeBlock::Evening => 3,
            TimeBlock::BeforeBed => 4,
            TimeBlock::Bonus => 5,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            TimeBlock::Morning => "morning",
            TimeBlock::ThroughoutDay => "throughout_day",
            TimeBlock::Evening => "evening",
            TimeBlock::BeforeBed => "before_bed",
            TimeBlock::Bonus => "bonus",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeBlock::Morning => "Morning Routine",
            TimeBlock::ThroughoutDay => "Throughout the Day",
            TimeBlock::Evening => "Evening Workout",
            TimeBlock::BeforeBed => "Before Bed",
            TimeBlock::Bonus => "Bonus",
        }
    }
}

impl FromStr for TimeBlock {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeBlock::ALL
            .into_iter()
            .find(|block| block.key() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown time block '{}'", s)))
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Exercise Definitions
// ============================================================================

/// Determines which target fields are meaningful for an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Reps,
    Timed,
    TimedHolds,
    QuickLog,
}

/// Per-side timer length in seconds for timed exercises
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerDuration {
    pub left: u32,
    pub right: u32,
}

/// One milestone in an exercise's progression table
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressionStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// How-to content shown alongside an exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instructions {
    pub title: String,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
}

/// An immutable catalog entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: String,
    pub time_block: TimeBlock,
    pub exercise_type: ExerciseType,
    /// Display string for the prescription, e.g. "15 each (22 right)"
    pub target_reps: String,
    pub left_target: u32,
    pub right_target: u32,
    pub sets: u32,
    #[serde(default)]
    pub bilateral: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_duration: Option<TimerDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_log_target: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progression_level: Option<u32>,
    /// Week (or level) number to milestone target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progression: Option<BTreeMap<u32, ProgressionStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Instructions>,
}

/// Typed partial Exercise used to rewrite maintained exercises
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExercisePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_target: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_target: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
}

impl Exercise {
    /// Return a copy of this exercise with the patch's fields laid over it
    pub fn patched(&self, patch: &ExercisePatch) -> Exercise {
        let mut patched = self.clone();
        if let Some(ref name) = patch.name {
            patched.name = name.clone();
        }
        if let Some(ref target_reps) = patch.target_reps {
            patched.target_reps = target_reps.clone();
        }
        if let Some(left) = patch.left_target {
            patched.left_target = left;
        }
        if let Some(right) = patch.right_target {
            patched.right_target = right;
        }
        if let Some(sets) = patch.sets {
            patched.sets = sets;
        }
        patched
    }
}

// ============================================================================
// Catalog and Schedule Types
// ============================================================================

/// Three ordered, disjoint lists of exercises
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub phase1: Vec<Exercise>,
    #[serde(default)]
    pub phase2: Vec<Exercise>,
    #[serde(default)]
    pub phase3: Vec<Exercise>,
}

/// Evening-session schedule for one phase
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ScheduleConfig {
    pub rest_days: Vec<Weekday>,
    pub workout_days: Vec<Weekday>,
    #[serde(default)]
    pub maintenance_days: Vec<Weekday>,
    /// Phase-1 exercise ids kept alive on maintenance days
    #[serde(default)]
    pub maintained_exercises: Vec<String>,
    #[serde(default)]
    pub maintenance_overrides: BTreeMap<String, ExercisePatch>,
}

/// Schedule configuration for every phase that has one
///
/// Phase 1 never has a schedule: every exercise shows every day.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScheduleTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase2: Option<ScheduleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase3: Option<ScheduleConfig>,
}

/// Rest/workout/maintenance labeling of one date for one phase
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub date: NaiveDate,
    pub is_rest_day: bool,
    pub is_workout_day: bool,
    pub is_maintenance_day: bool,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u32,
    pub day_name: &'static str,
}

// ============================================================================
// Progress and History Types
// ============================================================================

/// Values logged for one exercise on one day
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseLog {
    pub left: u32,
    pub right: u32,
    pub sets: u32,
    /// 0..=10
    pub pain: u8,
    #[serde(default)]
    pub notes: String,
}

/// Today's completion tracking and input values
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyProgress {
    pub date: NaiveDate,
    #[serde(default)]
    pub completed_exercises: Vec<String>,
    #[serde(default)]
    pub exercise_data: BTreeMap<String, ExerciseLog>,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    /// Phase the day was started under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
}

fn default_sound_enabled() -> bool {
    true
}

/// One exercise inside a recorded workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletedExercise {
    pub id: String,
    pub name: String,
    pub left: u32,
    pub right: u32,
    pub sets: u32,
    pub pain: u8,
    #[serde(default)]
    pub notes: String,
}

/// A finished day folded into the append-only history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub phase: Phase,
    pub exercises: Vec<CompletedExercise>,
    pub recorded_at: DateTime<Utc>,
}

// ============================================================================
// Assessments
// ============================================================================

/// Weekly functional check: balance, bridge and reach per side, pain by area
///
/// Measurements are optional since not every test is done every week.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyAssessment {
    pub id: Uuid,
    pub week: u32,
    pub date: NaiveDate,
    /// Single-leg stand, seconds
    #[serde(default)]
    pub stand_left: Option<u32>,
    #[serde(default)]
    pub stand_right: Option<u32>,
    /// Single-leg bridge, reps
    #[serde(default)]
    pub bridge_left: Option<u32>,
    #[serde(default)]
    pub bridge_right: Option<u32>,
    /// Balance reach hold, seconds
    #[serde(default)]
    pub reach_left: Option<u32>,
    #[serde(default)]
    pub reach_right: Option<u32>,
    pub knee_pain: u8,
    pub back_pain: u8,
    pub foot_pain: u8,
    #[serde(default)]
    pub notes: String,
    pub recorded_at: DateTime<Utc>,
}

/// Monthly girth measurements and phase readiness
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MonthlyAssessment {
    pub id: Uuid,
    pub month: u32,
    pub date: NaiveDate,
    /// Centimetres
    #[serde(default)]
    pub calf_right: Option<f64>,
    #[serde(default)]
    pub calf_left: Option<f64>,
    #[serde(default)]
    pub thigh_right: Option<f64>,
    #[serde(default)]
    pub thigh_left: Option<f64>,
    #[serde(default)]
    pub photos_taken: bool,
    #[serde(default)]
    pub video_taken: bool,
    pub phase: Phase,
    #[serde(default)]
    pub ready_next_phase: bool,
    #[serde(default)]
    pub notes: String,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_phase_falls_back_to_one() {
        assert_eq!(Phase::from_number(0), Phase::One);
        assert_eq!(Phase::from_number(99), Phase::One);
        assert_eq!(Phase::from_number(3), Phase::Three);
    }

    #[test]
    fn test_cumulative_phases() {
        let phases: Vec<_> = Phase::Two.cumulative().collect();
        assert_eq!(phases, vec![Phase::One, Phase::Two]);
    }

    #[test]
    fn test_time_block_parse() {
        assert_eq!(
            "throughout_day".parse::<TimeBlock>().unwrap(),
            TimeBlock::ThroughoutDay
        );
        assert!(matches!(
            "afternoon".parse::<TimeBlock>(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_time_block_order_matches_all() {
        for pair in TimeBlock::ALL.windows(2) {
            assert!(pair[0].order() < pair[1].order());
        }
    }

    #[test]
    fn test_patch_leaves_original_untouched() {
        let original = Exercise {
            id: "clamshells".into(),
            name: "Clamshells".into(),
            category: "Glute Med".into(),
            time_block: TimeBlock::Evening,
            exercise_type: ExerciseType::Reps,
            target_reps: "20 each".into(),
            left_target: 20,
            right_target: 30,
            sets: 3,
            bilateral: false,
            timer_duration: None,
            quick_log_target: None,
            group: None,
            group_label: None,
            progression_level: None,
            progression: None,
            instructions: None,
        };
        let patch = ExercisePatch {
            sets: Some(2),
            target_reps: Some("15 each".into()),
            ..Default::default()
        };

        let patched = original.patched(&patch);

        assert_eq!(patched.sets, 2);
        assert_eq!(patched.target_reps, "15 each");
        assert_eq!(patched.left_target, 20);
        assert_eq!(original.sets, 3);
        assert_eq!(original.target_reps, "20 each");
    }

    #[test]
    fn test_daily_progress_defaults_sound_on() {
        let progress: DailyProgress = serde_json::from_str(r#"{"date":"2025-06-10"}"#).unwrap();
        assert!(progress.sound_enabled);
        assert!(progress.completed_exercises.is_empty());
    }
}
