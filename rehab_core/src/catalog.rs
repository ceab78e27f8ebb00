//! Default exercise catalog and catalog access helpers.
//!
//! The built-in program is organised into three cumulative phases. Each
//! exercise is tagged with the time block it belongs to.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalogs.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

/// Small builder so the catalog data below reads as a table
struct Def(Exercise);

impl Def {
    fn new(id: &str, name: &str, category: &str, time_block: TimeBlock) -> Self {
        Def(Exercise {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            time_block,
            exercise_type: ExerciseType::Reps,
            target_reps: String::new(),
            left_target: 0,
            right_target: 0,
            sets: 1,
            bilateral: false,
            timer_duration: None,
            quick_log_target: None,
            group: None,
            group_label: None,
            progression_level: None,
            progression: None,
            instructions: None,
        })
    }

    fn reps(mut self, target_reps: &str, left: u32, right: u32, sets: u32) -> Self {
        self.0.exercise_type = ExerciseType::Reps;
        self.0.target_reps = target_reps.into();
        self.0.left_target = left;
        self.0.right_target = right;
        self.0.sets = sets;
        self
    }

    fn timed(mut self, target_reps: &str, left: u32, right: u32, sets: u32) -> Self {
        self.0.exercise_type = ExerciseType::Timed;
        self.0.target_reps = target_reps.into();
        self.0.left_target = left;
        self.0.right_target = right;
        self.0.sets = sets;
        self.0.timer_duration = Some(TimerDuration { left, right });
        self
    }

    fn holds(mut self, target_reps: &str, reps: (u32, u32), hold: (u32, u32), sets: u32) -> Self {
        self.0.exercise_type = ExerciseType::TimedHolds;
        self.0.target_reps = target_reps.into();
        self.0.left_target = reps.0;
        self.0.right_target = reps.1;
        self.0.sets = sets;
        self.0.timer_duration = Some(TimerDuration {
            left: hold.0,
            right: hold.1,
        });
        self
    }

    fn quick_log(mut self, target_reps: &str, times_per_day: u32) -> Self {
        self.0.exercise_type = ExerciseType::QuickLog;
        self.0.target_reps = target_reps.into();
        self.0.left_target = times_per_day;
        self.0.right_target = times_per_day;
        self.0.sets = 1;
        self.0.bilateral = true;
        self.0.quick_log_target = Some(times_per_day);
        self
    }

    fn bilateral(mut self) -> Self {
        self.0.bilateral = true;
        self
    }

    fn level(mut self, group: &str, label: &str, level: u32) -> Self {
        self.0.group = Some(group.into());
        self.0.group_label = Some(label.into());
        self.0.progression_level = Some(level);
        self
    }

    fn progression(mut self, steps: &[(u32, Option<u32>, Option<u32>, &str)]) -> Self {
        let table = steps
            .iter()
            .map(|(week, left, right, note)| {
                let step = ProgressionStep {
                    left: *left,
                    right: *right,
                    note: (!note.is_empty()).then(|| note.to_string()),
                };
                (*week, step)
            })
            .collect::<BTreeMap<_, _>>();
        self.0.progression = Some(table);
        self
    }

    fn instructions(mut self, title: &str, steps: &[&str], tips: &[&str]) -> Self {
        self.0.instructions = Some(Instructions {
            title: title.into(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            tips: tips.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    fn build(self) -> Exercise {
        self.0
    }
}

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> Catalog {
    use TimeBlock::*;

    // ========================================================================
    // Phase 1: Foundation
    // ========================================================================

    let phase1 = vec![
        // Morning routine
        Def::new("cat_cow", "Cat-Cow", "Mobility", Morning)
            .reps("10 slow cycles", 10, 10, 1)
            .bilateral()
            .instructions(
                "Cat-Cow",
                &[
                    "Start on hands and knees, wrists under shoulders",
                    "Round your back toward the ceiling and tuck your chin",
                    "Let your belly drop and lift your chest",
                ],
                &["Move with your breath"],
            )
            .build(),
        Def::new("pelvic_tilts", "Pelvic Tilts", "Core", Morning)
            .reps("15", 15, 15, 1)
            .bilateral()
            .build(),
        Def::new("short_foot", "Short Foot Exercise", "Foot & Ankle", Morning)
            .reps("15 each (22 right)", 15, 22, 2)
            .instructions(
                "Short Foot",
                &[
                    "Sit with feet flat on the floor",
                    "Shorten the foot by pulling the ball toward the heel without curling the toes",
                    "Hold 5 seconds and release",
                ],
                &[],
            )
            .build(),
        Def::new("standing_hip_circles", "Standing Hip Circles", "Mobility", Morning)
            .reps("10 each direction", 10, 10, 1)
            .build(),
        // Throughout the day
        Def::new("glute_squeezes", "Glute Squeezes", "Glute Med", ThroughoutDay)
            .quick_log("10 squeezes, 5x per day", 5)
            .build(),
        Def::new("posture_resets", "Posture Resets", "Posture", ThroughoutDay)
            .quick_log("Every hour at your desk", 8)
            .build(),
        Def::new("heel_raises_quick", "Heel Raises", "Foot & Ankle", ThroughoutDay)
            .quick_log("15 raises, 3x per day", 3)
            .build(),
        Def::new("hip_flexor_quick_stretch", "Standing Hip Flexor Stretch", "Hip Flexor", ThroughoutDay)
            .quick_log("30 sec each side, 3x per day", 3)
            .build(),
        // Evening workout
        Def::new("hip_flexor_warmup", "Hip Flexor Warm-Up", "Hip Flexor", Evening)
            .timed("30 sec each side", 30, 30, 2)
            .instructions(
                "Half-Kneeling Hip Flexor Warm-Up",
                &[
                    "Kneel on one knee with the other foot in front",
                    "Tuck the pelvis and shift forward gently",
                    "Hold, then switch sides",
                ],
                &["Squeeze the glute of the kneeling leg"],
            )
            .build(),
        Def::new("supine_glute_med", "Supine Glute Med Activation", "Glute Med", Evening)
            .reps("15 each (22 right)", 15, 22, 2)
            .build(),
        Def::new("clamshells", "Clamshells", "Glute Med", Evening)
            .reps("20 each (30 right)", 20, 30, 3)
            .instructions(
                "Clamshells",
                &[
                    "Lie on your side with knees bent at 45 degrees",
                    "Keep feet together and lift the top knee",
                    "Lower slowly",
                ],
                &["Do not let the pelvis roll back"],
            )
            .build(),
        Def::new("hip_abduction", "Side-Lying Hip Abduction", "Glute Med", Evening)
            .reps("15 each (22 right)", 15, 22, 3)
            .build(),
        Def::new("glute_bridges", "Glute Bridges (Both Legs)", "Hip & Glute", Evening)
            .reps("20", 20, 20, 3)
            .bilateral()
            .build(),
        Def::new("single_leg_bridge", "Single-Leg Glute Bridge", "Hip & Glute", Evening)
            .reps("12 each (18 right)", 12, 18, 3)
            .build(),
        Def::new("prone_hamstring_curls", "Prone Hamstring Curls", "Hamstring", Evening)
            .reps("12 each (18 right)", 12, 18, 3)
            .build(),
        Def::new("dead_bug_holds", "Dead Bug Holds", "Core", Evening)
            .holds("6 each side, 10-15 sec holds", (6, 6), (10, 15), 3)
            .build(),
        Def::new("bird_dog_holds", "Bird Dog Holds", "Core", Evening)
            .holds("6 each side, 15-20 sec holds", (6, 6), (15, 20), 3)
            .build(),
        Def::new("plank", "Plank", "Core", Evening)
            .timed("20-40 sec", 20, 20, 3)
            .bilateral()
            .progression(&[
                (1, Some(20), Some(20), "Knees down"),
                (3, Some(30), Some(30), "Full plank"),
                (5, Some(45), Some(45), "Full plank"),
                (8, Some(60), Some(60), "Full plank, add shoulder taps"),
            ])
            .build(),
        Def::new("side_plank", "Side Plank (Knees)", "Core", Evening)
            .timed("15-30 sec each side", 15, 20, 2)
            .build(),
        Def::new("decompression_cooldown", "Decompression Cool-Down", "Decompression", Evening)
            .timed("2 min", 120, 120, 1)
            .bilateral()
            .build(),
        // Before bed
        Def::new("crocodile_breathing", "Crocodile Breathing", "Decompression", BeforeBed)
            .timed("2 min", 120, 120, 1)
            .bilateral()
            .build(),
        Def::new("legs_up_wall", "Legs Up the Wall", "Decompression", BeforeBed)
            .timed("3-5 min", 180, 180, 1)
            .bilateral()
            .build(),
        // Bonus
        Def::new("toe_yoga", "Toe Yoga", "Foot & Ankle", Bonus)
            .reps("10 each direction", 10, 15, 2)
            .build(),
        Def::new("towel_scrunch", "Towel Scrunches", "Foot & Ankle", Bonus)
            .reps("20 each foot", 20, 30, 2)
            .build(),
        Def::new("single_leg_balance_1", "Single-Leg Balance: Eyes Open, Hand Support", "Balance", Bonus)
            .timed("30-60 sec each", 30, 45, 3)
            .level("balance", "Single-Leg Balance", 1)
            .build(),
        Def::new("single_leg_balance_2", "Single-Leg Balance: Eyes Open, No Support", "Balance", Bonus)
            .timed("30-60 sec each", 30, 45, 3)
            .level("balance", "Single-Leg Balance", 2)
            .build(),
        Def::new("single_leg_balance_3", "Single-Leg Balance: Head Turns", "Balance", Bonus)
            .timed("30-60 sec each", 30, 45, 3)
            .level("balance", "Single-Leg Balance", 3)
            .build(),
        Def::new("single_leg_balance_4", "Single-Leg Balance: Eyes Closed", "Balance", Bonus)
            .timed("20-30 sec each", 20, 30, 3)
            .level("balance", "Single-Leg Balance", 4)
            .build(),
        Def::new("single_leg_balance_5", "Single-Leg Balance: Unstable Surface", "Balance", Bonus)
            .timed("20-30 sec each", 20, 30, 3)
            .level("balance", "Single-Leg Balance", 5)
            .build(),
        Def::new("calf_raises", "Calf Raises", "Foot & Ankle", Bonus)
            .reps("15-20", 15, 22, 3)
            .build(),
        Def::new("piriformis_stretch", "Piriformis Stretch", "Mobility", Bonus)
            .timed("30 sec hold", 30, 30, 3)
            .build(),
    ];

    // ========================================================================
    // Phase 2: Functional Strength
    // ========================================================================

    let phase2 = vec![
        Def::new("worlds_greatest_stretch", "World's Greatest Stretch", "Mobility", Morning)
            .reps("5 each side", 5, 5, 1)
            .build(),
        Def::new("standing_glute_activation", "Standing Glute Activation", "Glute Med", Morning)
            .reps("10 each (15 right)", 10, 15, 1)
            .build(),
        Def::new("mini_band_walks_quick", "Mini Band Walks", "Glute Med", ThroughoutDay)
            .quick_log("10 steps each way, 2x per day", 2)
            .build(),
        Def::new("step_ups", "Step-Ups", "Single-Leg Strength", Evening)
            .reps("12 each (18 right)", 12, 18, 3)
            .progression(&[
                (9, Some(12), Some(18), "6-inch step"),
                (12, Some(12), Some(18), "8-inch step"),
                (15, Some(15), Some(22), "12-inch step, hold dumbbells"),
            ])
            .instructions(
                "Step-Ups",
                &[
                    "Stand facing a step",
                    "Drive through the heel of the lead leg to stand tall",
                    "Lower under control",
                ],
                &["Keep the knee tracking over the second toe"],
            )
            .build(),
        Def::new("split_squats", "Split Squats (Bulgarian)", "Single-Leg Strength", Evening)
            .reps("10 each (15 right)", 10, 15, 3)
            .build(),
        Def::new("single_leg_deadlift", "Single-Leg Deadlift", "Single-Leg Strength", Evening)
            .reps("10 each (15 right)", 10, 15, 3)
            .build(),
        Def::new("lateral_band_walks", "Lateral Band Walks", "Dynamic Stability", Evening)
            .reps("15 steps each way", 15, 15, 3)
            .bilateral()
            .build(),
        Def::new("balance_reaches", "Single-Leg Balance Reaches", "Dynamic Stability", Evening)
            .reps("8 each direction", 8, 12, 2)
            .build(),
        Def::new("goblet_squats", "Goblet Squats", "Controlled Loading", Evening)
            .reps("12-15", 12, 12, 3)
            .bilateral()
            .build(),
        Def::new("copenhagen_plank", "Copenhagen Plank", "Core", Evening)
            .timed("15-25 sec each side", 15, 25, 2)
            .progression(&[
                (9, None, None, "Short lever: knee on the bench"),
                (15, Some(20), Some(30), "Long lever: foot on the bench"),
            ])
            .build(),
        Def::new("single_leg_bridge_elevated", "Elevated Single-Leg Bridge", "Hip & Glute", Evening)
            .reps("10 each (15 right)", 10, 15, 3)
            .build(),
        Def::new("bird_dog_movement", "Bird Dog (Moving)", "Core", Evening)
            .reps("10 each (15 right)", 10, 15, 3)
            .build(),
        Def::new("pallof_press", "Pallof Press", "Core", Evening)
            .reps("12 each side", 12, 12, 3)
            .build(),
    ];

    // ========================================================================
    // Phase 3: Advanced
    // ========================================================================

    let phase3 = vec![
        Def::new("deep_squat_hold", "Deep Squat Hold", "Mobility", Morning)
            .timed("60 sec", 60, 60, 1)
            .bilateral()
            .build(),
        Def::new("box_step_ups", "Box Step-Ups with Knee Drive", "Power & Plyometrics", Evening)
            .reps("10 each (15 right)", 10, 15, 3)
            .build(),
        Def::new("single_leg_hops", "Single-Leg Hops", "Power & Plyometrics", Evening)
            .reps("5-8 per direction", 5, 8, 3)
            .progression(&[
                (21, Some(5), Some(5), "In place"),
                (24, Some(6), Some(8), "Forward and back"),
                (28, Some(8), Some(8), "Four directions"),
            ])
            .build(),
        Def::new("farmers_carries", "Farmer's Carries", "Power & Plyometrics", Evening)
            .reps("20m each side", 20, 20, 3)
            .build(),
    ];

    Catalog {
        phase1,
        phase2,
        phase3,
    }
}

impl Catalog {
    /// Load a catalog from a JSON file
    ///
    /// The file has the same shape as the serialized `Catalog`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded catalog from {:?} ({} exercises)",
            path,
            catalog.len()
        );
        Ok(catalog)
    }

    /// Validate and return the catalog, or fail with every problem found
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(Error::CatalogValidation(errors.join("; ")))
        }
    }

    /// Exercises introduced in this phase only
    pub fn phase_exercises(&self, phase: Phase) -> &[Exercise] {
        match phase {
            Phase::One => &self.phase1,
            Phase::Two => &self.phase2,
            Phase::Three => &self.phase3,
        }
    }

    /// The cumulative exercise set for a phase, phase 1 first
    pub fn exercises_for_phase(&self, phase: Phase) -> Vec<&Exercise> {
        phase
            .cumulative()
            .flat_map(|p| self.phase_exercises(p).iter())
            .collect()
    }

    /// Cumulative exercises for a phase that belong to one time block
    pub fn exercises_for_time_block(&self, phase: Phase, block: TimeBlock) -> Vec<&Exercise> {
        self.exercises_for_phase(phase)
            .into_iter()
            .filter(|ex| ex.time_block == block)
            .collect()
    }

    /// Look up an exercise by id across all phases
    pub fn find(&self, id: &str) -> Option<&Exercise> {
        self.iter().find(|ex| ex.id == id)
    }

    /// The phase that introduced an exercise
    pub fn phase_of(&self, id: &str) -> Option<Phase> {
        Phase::ALL
            .into_iter()
            .find(|p| self.phase_exercises(*p).iter().any(|ex| ex.id == id))
    }

    /// Iterate every exercise in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.phase1
            .iter()
            .chain(self.phase2.iter())
            .chain(self.phase3.iter())
    }

    pub fn len(&self) -> usize {
        self.phase1.len() + self.phase2.len() + self.phase3.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for ex in self.iter() {
            if ex.id.is_empty() {
                errors.push(format!("Exercise '{}' has empty ID", ex.name));
            } else if !seen.insert(ex.id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", ex.id));
            }
            if ex.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", ex.id));
            }
            if ex.sets == 0 {
                errors.push(format!("Exercise '{}' has zero sets", ex.id));
            }

            match ex.exercise_type {
                ExerciseType::Timed | ExerciseType::TimedHolds if ex.timer_duration.is_none() => {
                    errors.push(format!(
                        "Timed exercise '{}' has no timer duration",
                        ex.id
                    ));
                }
                ExerciseType::QuickLog if ex.quick_log_target.is_none() => {
                    errors.push(format!(
                        "Quick-log exercise '{}' has no quick-log target",
                        ex.id
                    ));
                }
                _ => {}
            }

            if ex.progression_level.is_some() && ex.group.is_none() {
                errors.push(format!(
                    "Exercise '{}' has a progression level but no group",
                    ex.id
                ));
            }
        }

        // Group levels must run 1..N within each phase list
        for phase in Phase::ALL {
            let mut levels: HashMap<&str, Vec<u32>> = HashMap::new();
            for ex in self.phase_exercises(phase) {
                if let (Some(group), Some(level)) = (ex.group.as_deref(), ex.progression_level) {
                    levels.entry(group).or_default().push(level);
                }
            }
            for (group, mut found) in levels {
                found.sort_unstable();
                let expected: Vec<u32> = (1..=found.len() as u32).collect();
                if found != expected {
                    errors.push(format!(
                        "Group '{}' in phase {} has levels {:?}, expected 1..={}",
                        group,
                        phase,
                        found,
                        expected.len()
                    ));
                }
            }
        }

        errors
    }
}
