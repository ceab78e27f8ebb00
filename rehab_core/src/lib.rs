#![forbid(unsafe_code)]

//! Core domain model and scheduling logic for the rehab exercise tracker.
//!
//! This crate provides:
//! - Domain types (exercises, phases, time blocks, schedules, progress)
//! - The built-in exercise catalog and schedule table
//! - Date classification and exercise selection
//! - Group collapsing and week-based progression targets
//! - Persistence (daily progress, workout history, assessments, CSV export)
//! - Trend analytics over the workout history

pub mod types;
pub mod error;
pub mod catalog;
pub mod schedule;
pub mod config;
pub mod logging;
pub mod engine;
pub mod groups;
pub mod progression;
pub mod state;
pub mod jsonl;
pub mod history;
pub mod assessments;
pub mod analytics;
pub mod csv_export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use schedule::{build_default_schedule, classify, get_default_schedule, parse_date};
pub use config::Config;
pub use engine::{scheduled_exercises, select_exercises, time_blocks_present};
pub use groups::{collapse_groups, visible_exercises, GroupDescriptor, VisibleItem};
pub use progression::{resolve_target, ResolvedTarget};
pub use history::{HistorySink, JsonlHistory};
pub use csv_export::{export_monthly_csv, export_weekly_csv, export_workouts_csv};
