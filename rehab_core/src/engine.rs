//! Exercise selection for a date and time block.
//!
//! The selector filters the cumulative catalog for a phase:
//! - Non-evening blocks are never filtered by day
//! - Evening on a rest day is empty
//! - Evening on a workout day drops phase 1 exercises unless they are
//!   maintained and the day is a maintenance day, in which case any
//!   maintenance override is applied to a copy

use crate::schedule::{classify, parse_date};
use crate::{Catalog, Classification, Exercise, Phase, Result, ScheduleConfig, ScheduleTable, TimeBlock};
use std::borrow::Cow;

/// Select the exercises due for a time block given a date classification
///
/// Untouched catalog entries are borrowed; overridden maintenance entries are
/// owned copies, so the catalog itself is never modified. Catalog order is
/// preserved.
pub fn scheduled_exercises<'a>(
    catalog: &'a Catalog,
    phase: Phase,
    block: TimeBlock,
    classification: &Classification,
    schedule: Option<&ScheduleConfig>,
) -> Vec<Cow<'a, Exercise>> {
    let candidates = catalog.exercises_for_time_block(phase, block);

    let config = match schedule {
        Some(config) if phase != Phase::One && block == TimeBlock::Evening => config,
        _ => return candidates.into_iter().map(Cow::Borrowed).collect(),
    };

    if classification.is_rest_day || !classification.is_workout_day {
        tracing::debug!(
            "{} is a rest day for phase {}, no evening session",
            classification.day_name,
            phase
        );
        return Vec::new();
    }

    let phase1 = catalog.phase_exercises(Phase::One);
    let selected: Vec<Cow<'a, Exercise>> = candidates
        .into_iter()
        .filter_map(|ex| {
            let from_phase1 = phase1.iter().any(|p1| p1.id == ex.id);
            if !from_phase1 {
                return Some(Cow::Borrowed(ex));
            }

            let maintained = config.maintained_exercises.iter().any(|id| *id == ex.id);
            if !(maintained && classification.is_maintenance_day) {
                return None;
            }

            match config.maintenance_overrides.get(&ex.id) {
                Some(patch) => Some(Cow::Owned(ex.patched(patch))),
                None => Some(Cow::Borrowed(ex)),
            }
        })
        .collect();

    tracing::debug!(
        "Selected {} evening exercises for phase {} on {} (maintenance: {})",
        selected.len(),
        phase,
        classification.day_name,
        classification.is_maintenance_day
    );

    selected
}

/// Composed entry point: classify the date, then select
///
/// `block` and `date` are the raw keys a front end receives; both fail with
/// `Error::InvalidInput` when they cannot be interpreted.
pub fn select_exercises<'a>(
    catalog: &'a Catalog,
    schedules: &ScheduleTable,
    phase: Phase,
    block: &str,
    date: &str,
) -> Result<Vec<Cow<'a, Exercise>>> {
    let block: TimeBlock = block.parse()?;
    let date = parse_date(date)?;
    let schedule = schedules.for_phase(phase);
    let classification = classify(date, schedule);

    Ok(scheduled_exercises(
        catalog,
        phase,
        block,
        &classification,
        schedule,
    ))
}

/// Time blocks with at least one exercise in the phase, in display order
pub fn time_blocks_present(catalog: &Catalog, phase: Phase) -> Vec<TimeBlock> {
    let exercises = catalog.exercises_for_phase(phase);
    let mut blocks: Vec<TimeBlock> = TimeBlock::ALL
        .into_iter()
        .filter(|block| exercises.iter().any(|ex| ex.time_block == *block))
        .collect();
    blocks.sort_by_key(|block| block.order());
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::build_default_schedule;
    use crate::build_default_catalog;

    // 2025-06-08 is a Sunday
    const SUNDAY: &str = "2025-06-08";
    const MONDAY: &str = "2025-06-09";
    const TUESDAY: &str = "2025-06-10";
    const WEDNESDAY: &str = "2025-06-11";

    fn ids(exercises: &[Cow<'_, Exercise>]) -> Vec<String> {
        exercises.iter().map(|ex| ex.id.clone()).collect()
    }

    #[test]
    fn test_rest_day_evening_is_empty() {
        crate::logging::init_test();
        let catalog = build_default_catalog();
        let table = build_default_schedule();

        for phase in [Phase::Two, Phase::Three] {
            for date in [SUNDAY, WEDNESDAY] {
                let result = select_exercises(&catalog, &table, phase, "evening", date).unwrap();
                assert!(result.is_empty(), "phase {} on {}", phase, date);
            }
        }
    }

    #[test]
    fn test_non_evening_blocks_ignore_date() {
        let catalog = build_default_catalog();
        let table = build_default_schedule();

        for block in ["morning", "throughout_day", "before_bed", "bonus"] {
            let rest = select_exercises(&catalog, &table, Phase::Two, block, SUNDAY).unwrap();
            let work = select_exercises(&catalog, &table, Phase::Two, block, TUESDAY).unwrap();
            let maint = select_exercises(&catalog, &table, Phase::Two, block, MONDAY).unwrap();
            assert_eq!(ids(&rest), ids(&work), "{}", block);
            assert_eq!(ids(&rest), ids(&maint), "{}", block);
            assert!(!rest.is_empty(), "{}", block);
        }
    }

    #[test]
    fn test_maintenance_day_includes_maintained_with_overrides() {
        let catalog = build_default_catalog();
        let table = build_default_schedule();

        let result = select_exercises(&catalog, &table, Phase::Two, "evening", MONDAY).unwrap();
        let found = ids(&result);

        assert!(found.contains(&"hip_flexor_warmup".to_string()));
        assert!(found.contains(&"clamshells".to_string()));
        assert!(found.contains(&"plank".to_string()));
        assert!(!found.contains(&"supine_glute_med".to_string()));
        assert!(!found.contains(&"glute_bridges".to_string()));
        assert!(!found.contains(&"prone_hamstring_curls".to_string()));
        assert!(!found.contains(&"hip_abduction".to_string()));

        let warmup = result.iter().find(|ex| ex.id == "hip_flexor_warmup").unwrap();
        assert_eq!(warmup.sets, 1);
        let clamshells = result.iter().find(|ex| ex.id == "clamshells").unwrap();
        assert_eq!(clamshells.sets, 2);
        assert!(matches!(clamshells, Cow::Owned(_)));

        // No override: borrowed straight from the catalog
        let cooldown = result
            .iter()
            .find(|ex| ex.id == "decompression_cooldown")
            .unwrap();
        assert!(matches!(cooldown, Cow::Borrowed(_)));
    }

    #[test]
    fn test_plain_workout_day_excludes_all_phase_one() {
        let catalog = build_default_catalog();
        let table = build_default_schedule();

        let result = select_exercises(&catalog, &table, Phase::Two, "evening", TUESDAY).unwrap();
        let expected: Vec<String> = catalog
            .phase2
            .iter()
            .filter(|ex| ex.time_block == TimeBlock::Evening)
            .map(|ex| ex.id.clone())
            .collect();

        assert_eq!(ids(&result), expected);
        assert!(ids(&result).contains(&"copenhagen_plank".to_string()));
        assert!(ids(&result).contains(&"pallof_press".to_string()));
    }

    #[test]
    fn test_maintenance_preserves_catalog_order() {
        let catalog = build_default_catalog();
        let table = build_default_schedule();

        let result = select_exercises(&catalog, &table, Phase::Three, "evening", MONDAY).unwrap();
        let order: Vec<String> = catalog
            .exercises_for_time_block(Phase::Three, TimeBlock::Evening)
            .into_iter()
            .map(|ex| ex.id.clone())
            .filter(|id| ids(&result).contains(id))
            .collect();

        assert_eq!(ids(&result), order);
        // Phase 1 maintenance entries come before the phase 2 and 3 additions
        assert_eq!(result[0].id, "hip_flexor_warmup");
        assert!(ids(&result).contains(&"farmers_carries".to_string()));
    }

    #[test]
    fn test_overrides_never_touch_catalog() {
        let catalog = build_default_catalog();
        let table = build_default_schedule();

        let _ = select_exercises(&catalog, &table, Phase::Two, "evening", MONDAY).unwrap();
        assert_eq!(catalog.find("clamshells").unwrap().sets, 3);

        let phase1 = select_exercises(&catalog, &table, Phase::One, "evening", MONDAY).unwrap();
        let clamshells = phase1.iter().find(|ex| ex.id == "clamshells").unwrap();
        assert_eq!(clamshells.sets, 3);
    }

    #[test]
    fn test_phase_one_unfiltered() {
        let catalog = build_default_catalog();
        let table = build_default_schedule();

        for date in [SUNDAY, TUESDAY] {
            let result = select_exercises(&catalog, &table, Phase::One, "evening", date).unwrap();
            assert_eq!(
                result.len(),
                catalog
                    .exercises_for_time_block(Phase::One, TimeBlock::Evening)
                    .len()
            );
        }
    }

    #[test]
    fn test_missing_schedule_means_no_restrictions() {
        let catalog = build_default_catalog();
        let table = ScheduleTable::default();

        let result = select_exercises(&catalog, &table, Phase::Two, "evening", SUNDAY).unwrap();
        assert_eq!(
            result.len(),
            catalog
                .exercises_for_time_block(Phase::Two, TimeBlock::Evening)
                .len()
        );
    }

    #[test]
    fn test_later_phase_is_superset_before_filtering() {
        let catalog = build_default_catalog();
        let table = ScheduleTable::default();

        for block in TimeBlock::ALL {
            let p1 = select_exercises(&catalog, &table, Phase::One, block.key(), TUESDAY).unwrap();
            let p2 = ids(&select_exercises(&catalog, &table, Phase::Two, block.key(), TUESDAY).unwrap());
            for id in ids(&p1) {
                assert!(p2.contains(&id), "{} missing from phase 2 {}", id, block);
            }
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let catalog = build_default_catalog();
        let table = build_default_schedule();

        assert!(matches!(
            select_exercises(&catalog, &table, Phase::Two, "lunch", MONDAY),
            Err(crate::Error::InvalidInput(_))
        ));
        assert!(matches!(
            select_exercises(&catalog, &table, Phase::Two, "evening", "2025-02-30"),
            Err(crate::Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_time_blocks_present_in_display_order() {
        let catalog = build_default_catalog();
        assert_eq!(time_blocks_present(&catalog, Phase::One), TimeBlock::ALL.to_vec());

        let mut sparse = Catalog::default();
        sparse.phase1.push(catalog.find("legs_up_wall").unwrap().clone());
        sparse.phase2.push(catalog.find("worlds_greatest_stretch").unwrap().clone());
        assert_eq!(
            time_blocks_present(&sparse, Phase::Two),
            vec![TimeBlock::Morning, TimeBlock::BeforeBed]
        );
        assert_eq!(
            time_blocks_present(&sparse, Phase::One),
            vec![TimeBlock::BeforeBed]
        );
    }
}
