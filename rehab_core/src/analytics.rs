//! Trend review over the workout history.
//!
//! Everything here is a pure function of the recorded workouts (and the
//! catalog where targets or categories are needed). Percentages are whole
//! numbers 0..=100; averages are rounded to one decimal place.

use crate::{Catalog, WorkoutRecord};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Pain at or below this level counts as pain-free
pub const PAIN_FREE_MAX: u8 = 3;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PainPoint {
    pub date: NaiveDate,
    pub avg_pain: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExercisePain {
    pub id: String,
    pub avg_pain: f64,
    pub sessions: u32,
}

/// Right/left rep ratio for one exercise; 1.0 is symmetric
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Asymmetry {
    pub id: String,
    pub name: String,
    pub left: u32,
    pub right: u32,
    pub ratio: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AsymmetryImprovement {
    pub improved: u32,
    pub total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WeeklyVolume {
    /// Monday of the week
    pub week_start: NaiveDate,
    pub volume: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: u32,
    pub percentage: u32,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Records dated within the last `days` days of `today`, inclusive
///
/// `records` must be sorted by date, as `read_records` returns them.
/// `None` keeps everything.
pub fn recent(records: &[WorkoutRecord], today: NaiveDate, days: Option<u32>) -> &[WorkoutRecord] {
    let Some(days) = days else {
        return records;
    };
    let cutoff = today - Duration::days(days as i64);
    let start = records.partition_point(|r| r.date < cutoff);
    &records[start..]
}

/// Average pain per workout, oldest first
pub fn pain_trend(records: &[WorkoutRecord]) -> Vec<PainPoint> {
    let mut points: Vec<PainPoint> = records
        .iter()
        .filter(|r| !r.exercises.is_empty())
        .map(|r| PainPoint {
            date: r.date,
            avg_pain: round1(crate::history::average_pain(r) as f64),
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Average pain per exercise, most painful first
pub fn exercise_pain(records: &[WorkoutRecord]) -> Vec<ExercisePain> {
    let mut totals: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for ex in records.iter().flat_map(|r| &r.exercises) {
        let entry = totals.entry(ex.id.as_str()).or_default();
        entry.0 += ex.pain as u32;
        entry.1 += 1;
    }

    let mut out: Vec<ExercisePain> = totals
        .into_iter()
        .map(|(id, (sum, count))| ExercisePain {
            id: id.to_string(),
            avg_pain: round1(sum as f64 / count as f64),
            sessions: count,
        })
        .collect();
    out.sort_by(|a, b| b.avg_pain.total_cmp(&a.avg_pain));
    out
}

/// Share of logged exercises with pain at or below `PAIN_FREE_MAX`
pub fn pain_free_rate(records: &[WorkoutRecord]) -> u32 {
    let (free, total) = records
        .iter()
        .flat_map(|r| &r.exercises)
        .fold((0u64, 0u64), |(free, total), ex| {
            (free + u64::from(ex.pain <= PAIN_FREE_MAX), total + 1)
        });
    percent(free, total)
}

/// Left/right imbalance in the latest workout that logged anything
///
/// Only exercises with both sides above zero and unequal are reported.
pub fn asymmetry_ratios(records: &[WorkoutRecord]) -> Vec<Asymmetry> {
    let Some(latest) = records.iter().rev().find(|r| !r.exercises.is_empty()) else {
        return Vec::new();
    };

    latest
        .exercises
        .iter()
        .filter(|ex| ex.left > 0 && ex.right > 0 && ex.left != ex.right)
        .map(|ex| Asymmetry {
            id: ex.id.clone(),
            name: ex.name.clone(),
            left: ex.left,
            right: ex.right,
            ratio: round2(ex.right as f64 / ex.left as f64),
        })
        .collect()
}

/// How many exercises got more symmetric between the first and latest workout
pub fn asymmetry_improvement(records: &[WorkoutRecord]) -> AsymmetryImprovement {
    let mut logged = records.iter().filter(|r| !r.exercises.is_empty());
    let (Some(first), Some(last)) = (logged.next(), logged.last()) else {
        return AsymmetryImprovement::default();
    };

    let imbalance = |left: u32, right: u32| (1.0 - right as f64 / left as f64).abs();
    let mut result = AsymmetryImprovement::default();

    for late in &last.exercises {
        let Some(early) = first.exercises.iter().find(|ex| ex.id == late.id) else {
            continue;
        };
        if early.left == 0 || early.right == 0 || late.left == 0 || late.right == 0 {
            continue;
        }
        result.total += 1;
        if imbalance(late.left, late.right) < imbalance(early.left, early.right) {
            result.improved += 1;
        }
    }
    result
}

/// Monday starting the week that contains `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Total reps (both sides times sets) per calendar week, oldest first
pub fn volume_by_week(records: &[WorkoutRecord]) -> Vec<WeeklyVolume> {
    let mut weeks: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        let volume = weeks.entry(week_start(record.date)).or_default();
        for ex in &record.exercises {
            *volume += (ex.left as u64 + ex.right as u64) * ex.sets.max(1) as u64;
        }
    }
    weeks
        .into_iter()
        .map(|(week_start, volume)| WeeklyVolume { week_start, volume })
        .collect()
}

/// Logged exercises by catalog category, largest first
///
/// Ids no longer in the catalog count as "Other".
pub fn category_distribution(records: &[WorkoutRecord], catalog: &Catalog) -> Vec<CategoryShare> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut total = 0u64;
    for ex in records.iter().flat_map(|r| &r.exercises) {
        let category = catalog
            .find(&ex.id)
            .map_or("Other", |def| def.category.as_str());
        *counts.entry(category.to_string()).or_default() += 1;
        total += 1;
    }

    let mut out: Vec<CategoryShare> = counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category,
            count,
            percentage: percent(count as u64, total),
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Number of distinct exercises logged
pub fn exercise_variety(records: &[WorkoutRecord]) -> usize {
    records
        .iter()
        .flat_map(|r| &r.exercises)
        .map(|ex| ex.id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Reps achieved against catalog base targets, capped at 100
pub fn target_compliance(records: &[WorkoutRecord], catalog: &Catalog) -> u32 {
    let mut target = 0u64;
    let mut achieved = 0u64;
    for ex in records.iter().flat_map(|r| &r.exercises) {
        if let Some(def) = catalog.find(&ex.id) {
            target += def.left_target as u64 + def.right_target as u64;
            achieved += ex.left as u64 + ex.right as u64;
        }
    }
    percent(achieved, target).min(100)
}

/// Exercises logged per workout against the size of that phase's program
pub fn completion_rate(records: &[WorkoutRecord], catalog: &Catalog) -> u32 {
    let mut possible = 0u64;
    let mut done = 0u64;
    for record in records {
        possible += catalog.exercises_for_phase(record.phase).len() as u64;
        done += record.exercises.len() as u64;
    }
    percent(done, possible)
}

const WEEK_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Weekday with the most workouts; ties go to the earliest day from Sunday
pub fn best_training_day(records: &[WorkoutRecord]) -> Option<Weekday> {
    let mut counts = [0u32; 7];
    for record in records {
        counts[record.date.weekday().num_days_from_sunday() as usize] += 1;
    }

    let mut best: Option<(usize, u32)> = None;
    for (index, &count) in counts.iter().enumerate() {
        if count > 0 && best.map_or(true, |(_, top)| count > top) {
            best = Some((index, count));
        }
    }
    best.map(|(index, _)| WEEK_FROM_SUNDAY[index])
}

/// Every metric at once, for display
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub workouts: usize,
    pub pain_trend: Vec<PainPoint>,
    pub exercise_pain: Vec<ExercisePain>,
    pub pain_free_rate: u32,
    pub asymmetry: Vec<Asymmetry>,
    pub asymmetry_improvement: AsymmetryImprovement,
    pub volume_by_week: Vec<WeeklyVolume>,
    pub categories: Vec<CategoryShare>,
    pub variety: usize,
    pub target_compliance: u32,
    pub completion_rate: u32,
    pub best_training_day: Option<Weekday>,
}

pub fn summarize(records: &[WorkoutRecord], catalog: &Catalog) -> Summary {
    Summary {
        workouts: records.len(),
        pain_trend: pain_trend(records),
        exercise_pain: exercise_pain(records),
        pain_free_rate: pain_free_rate(records),
        asymmetry: asymmetry_ratios(records),
        asymmetry_improvement: asymmetry_improvement(records),
        volume_by_week: volume_by_week(records),
        categories: category_distribution(records, catalog),
        variety: exercise_variety(records),
        target_compliance: target_compliance(records, catalog),
        completion_rate: completion_rate(records, catalog),
        best_training_day: best_training_day(records),
    }
}
