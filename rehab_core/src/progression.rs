//! Week-based progression targets.
//!
//! Progression tables are sparse: an entry keyed by week 5 applies to week 5
//! and every later week until a higher key takes over.

use crate::{Exercise, ProgressionStep};
use serde::Serialize;

/// The target an exercise should be performed at for a given week
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    /// The milestone key that matched
    pub milestone: u32,
    pub left: Option<u32>,
    pub right: Option<u32>,
    pub note: Option<String>,
}

impl ResolvedTarget {
    /// Numeric targets with the exercise's base values filling any gaps
    pub fn targets_or_base(&self, exercise: &Exercise) -> (u32, u32) {
        (
            self.left.unwrap_or(exercise.left_target),
            self.right.unwrap_or(exercise.right_target),
        )
    }
}

/// Resolve the progression milestone in effect for a week (or level)
///
/// Returns `None` when the exercise has no progression table, or when the
/// week comes before the first milestone; callers then use the base
/// `left_target`/`right_target`.
pub fn resolve_target(exercise: &Exercise, week: u32) -> Option<ResolvedTarget> {
    let table = exercise.progression.as_ref()?;
    let (milestone, step) = table.range(..=week).next_back()?;

    tracing::trace!(
        "Progression for {} at week {}: milestone {}",
        exercise.id,
        week,
        milestone
    );

    let ProgressionStep { left, right, note } = step.clone();
    Some(ResolvedTarget {
        milestone: *milestone,
        left,
        right,
        note,
    })
}
