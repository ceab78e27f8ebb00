use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rehab_core::history::{current_week, read_records};
use rehab_core::*;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "rehab")]
#[command(about = "Phase-based rehab exercise tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the program phase (1-3)
    #[arg(long, global = true)]
    phase: Option<u8>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the exercises scheduled for a day (default)
    Today {
        /// Only show one time block (morning, throughout_day, evening, before_bed, bonus)
        #[arg(long)]
        block: Option<String>,

        /// Date to show instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the whole phase with progression groups collapsed
    Plan {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the time blocks the phase uses
    Blocks,

    /// Mark an exercise complete for the day
    Log {
        /// Exercise id
        id: String,

        #[arg(long, default_value_t = 0)]
        left: u32,

        #[arg(long, default_value_t = 0)]
        right: u32,

        #[arg(long, default_value_t = 1)]
        sets: u32,

        /// Pain level 0-10
        #[arg(long, default_value_t = 0)]
        pain: u8,

        #[arg(long, default_value = "")]
        notes: String,

        /// Day to log against instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Undo a completion for the day
    Unlog {
        /// Exercise id
        id: String,

        #[arg(long)]
        date: Option<String>,
    },

    /// List recorded workouts
    History,

    /// Export recorded workouts and assessments to CSV
    Export {
        /// Workout output file
        file: Option<PathBuf>,

        /// Write weekly assessments to this file
        #[arg(long)]
        weekly: Option<PathBuf>,

        /// Write monthly assessments to this file
        #[arg(long)]
        monthly: Option<PathBuf>,
    },

    /// Record or list assessments
    Assess {
        #[command(subcommand)]
        kind: AssessKind,
    },

    /// Summarize trends in the recorded workouts
    Stats {
        /// Only look at the last N days
        #[arg(long)]
        days: Option<u32>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check the catalog and schedule table for errors
    Validate,
}

#[derive(Subcommand)]
enum AssessKind {
    /// Record the weekly balance and strength tests
    Weekly {
        /// Program week (defaults to the current week)
        #[arg(long)]
        week: Option<u32>,

        #[arg(long)]
        date: Option<String>,

        /// Single-leg stand, seconds
        #[arg(long)]
        stand_left: Option<u32>,
        #[arg(long)]
        stand_right: Option<u32>,

        /// Single-leg bridge, reps
        #[arg(long)]
        bridge_left: Option<u32>,
        #[arg(long)]
        bridge_right: Option<u32>,

        /// Balance reach hold, seconds
        #[arg(long)]
        reach_left: Option<u32>,
        #[arg(long)]
        reach_right: Option<u32>,

        #[arg(long, default_value_t = 0)]
        knee_pain: u8,
        #[arg(long, default_value_t = 0)]
        back_pain: u8,
        #[arg(long, default_value_t = 0)]
        foot_pain: u8,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Record the monthly girth measurements
    Monthly {
        /// Program month (defaults to the month of the current week)
        #[arg(long)]
        month: Option<u32>,

        #[arg(long)]
        date: Option<String>,

        /// Centimetres
        #[arg(long)]
        calf_right: Option<f64>,
        #[arg(long)]
        calf_left: Option<f64>,
        #[arg(long)]
        thigh_right: Option<f64>,
        #[arg(long)]
        thigh_left: Option<f64>,

        #[arg(long)]
        photos: bool,
        #[arg(long)]
        video: bool,

        /// Ready to move to the next phase
        #[arg(long)]
        ready: bool,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List saved assessments
    Show,
}

/// Resolved paths and program data for one invocation
struct Context {
    data: config::DataConfig,
    phase: Phase,
    catalog: Cow<'static, Catalog>,
    schedules: Cow<'static, ScheduleTable>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    rehab_core::logging::init(cli.verbose);

    let config = Config::load()?;

    // Validation reports problems itself instead of failing on load
    if let Some(Commands::Validate) = cli.command {
        return cmd_validate(&config);
    }

    let mut data = config.data.clone();
    if let Some(dir) = cli.data_dir {
        data.data_dir = dir;
    }
    let phase = cli
        .phase
        .map(Phase::from_number)
        .unwrap_or(config.program.phase);
    let catalog = config.load_catalog()?;
    let schedules = config.load_schedule(&catalog)?;

    let ctx = Context {
        data,
        phase,
        catalog,
        schedules,
    };

    match cli.command {
        Some(Commands::Today { block, date, json }) => {
            cmd_today(&ctx, block.as_deref(), date.as_deref(), json)
        }
        Some(Commands::Plan { json }) => cmd_plan(&ctx, json),
        Some(Commands::Blocks) => cmd_blocks(&ctx),
        Some(Commands::Log {
            id,
            left,
            right,
            sets,
            pain,
            notes,
            date,
        }) => {
            let log = ExerciseLog {
                left,
                right,
                sets,
                pain,
                notes,
            };
            cmd_log(&ctx, &id, log, date.as_deref())
        }
        Some(Commands::Unlog { id, date }) => cmd_unlog(&ctx, &id, date.as_deref()),
        Some(Commands::History) => cmd_history(&ctx),
        Some(Commands::Export {
            file,
            weekly,
            monthly,
        }) => cmd_export(&ctx, file.as_deref(), weekly.as_deref(), monthly.as_deref()),
        Some(Commands::Assess { kind }) => cmd_assess(&ctx, kind),
        Some(Commands::Stats { days, json }) => cmd_stats(&ctx, days, json),
        Some(Commands::Validate) => cmd_validate(&config),
        None => cmd_today(&ctx, None, None, false),
    }
}

fn resolve_day(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => parse_date(d),
        None => Ok(Local::now().date_naive()),
    }
}

/// Fold any earlier day into history and return the progress for `day`
fn start_day(ctx: &Context, day: NaiveDate) -> Result<DailyProgress> {
    let mut history = JsonlHistory::new(ctx.data.history_path());
    let (progress, archived) = DailyProgress::roll_over(
        &ctx.data.progress_path(),
        &mut history,
        &ctx.catalog,
        ctx.phase,
        day,
    )?;
    if let Some(record) = archived {
        tracing::info!("Recorded workout for {}", record.date);
    }
    Ok(progress)
}

fn cmd_today(ctx: &Context, block: Option<&str>, date: Option<&str>, json: bool) -> Result<()> {
    let day = resolve_day(date)?;
    let date_key = day.format("%Y-%m-%d").to_string();

    let blocks = match block {
        Some(key) => vec![key.parse::<TimeBlock>()?],
        None => time_blocks_present(&ctx.catalog, ctx.phase),
    };

    let classification = classify(day, ctx.schedules.for_phase(ctx.phase));
    let progress = DailyProgress::load_for(&ctx.data.progress_path(), day)?;
    let records = read_records(&ctx.data.history_path())?;
    let week = current_week(&records, day);

    if json {
        let mut sections = serde_json::Map::new();
        for block in &blocks {
            let exercises =
                select_exercises(&ctx.catalog, &ctx.schedules, ctx.phase, block.key(), &date_key)?;
            sections.insert(block.key().to_string(), serde_json::to_value(&exercises)?);
        }
        let out = serde_json::json!({
            "phase": ctx.phase.number(),
            "week": week,
            "classification": classification,
            "blocks": sections,
            "completed": progress.completed_exercises,
            "completion_percent": progress.completion_percent(&ctx.catalog, ctx.phase),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", ctx.phase.title());
    println!("{} {} (week {})", classification.day_name, date_key, week);
    if classification.is_rest_day {
        println!("Rest day");
    } else if classification.is_maintenance_day {
        println!("Workout day with phase 1 maintenance");
    }
    let total = ctx.catalog.exercises_for_phase(ctx.phase).len();
    println!(
        "{}/{} completed ({}%)",
        progress.completed_exercises.len().min(total),
        total,
        progress.completion_percent(&ctx.catalog, ctx.phase)
    );

    for block in blocks {
        let exercises =
            select_exercises(&ctx.catalog, &ctx.schedules, ctx.phase, block.key(), &date_key)?;

        println!();
        println!("{}", block.label());
        if exercises.is_empty() {
            if block == TimeBlock::Evening {
                println!("  Rest day - no evening session");
            } else {
                println!("  Nothing scheduled");
            }
            continue;
        }

        for ex in &exercises {
            let mark = if progress.is_complete(&ex.id) { "x" } else { " " };
            println!("  [{}] {} ({})  {}", mark, ex.name, ex.id, describe_target(ex, week));
        }
    }

    Ok(())
}

fn describe_target(ex: &Exercise, week: u32) -> String {
    if let Some(target) = ex.quick_log_target {
        return format!("target {} today", target);
    }

    let resolved = progression::resolve_target(ex, week);
    let (left, right) = resolved
        .as_ref()
        .map(|t| t.targets_or_base(ex))
        .unwrap_or((ex.left_target, ex.right_target));
    let unit = match ex.exercise_type {
        ExerciseType::Timed | ExerciseType::TimedHolds => "s",
        _ => "",
    };

    let mut text = if left == right {
        format!("{} x {}{}", ex.sets, left, unit)
    } else {
        format!("{} x L {}{} / R {}{}", ex.sets, left, unit, right, unit)
    };
    if let Some(note) = resolved.and_then(|t| t.note) {
        text.push_str(&format!(" - {}", note));
    }
    text
}

fn cmd_plan(ctx: &Context, json: bool) -> Result<()> {
    let items = visible_exercises(&ctx.catalog, ctx.phase);

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("{}", ctx.phase.title());
    for item in &items {
        match item {
            VisibleItem::Single(ex) => {
                println!("  {:<16} {}", ex.time_block.key(), ex.name);
            }
            VisibleItem::Group(group) => {
                let label = group.group_label.unwrap_or(group.group);
                let block = group
                    .exercises
                    .first()
                    .map_or("", |ex| ex.time_block.key());
                println!("  {:<16} {} ({} levels)", block, label, group.exercises.len());
            }
        }
    }
    Ok(())
}

fn cmd_blocks(ctx: &Context) -> Result<()> {
    for block in time_blocks_present(&ctx.catalog, ctx.phase) {
        println!("{:<16} {}", block.key(), block.label());
    }
    Ok(())
}

fn cmd_log(ctx: &Context, id: &str, log: ExerciseLog, date: Option<&str>) -> Result<()> {
    let day = resolve_day(date)?;
    let exercise = ctx
        .catalog
        .find(id)
        .ok_or_else(|| Error::InvalidInput(format!("unknown exercise '{}'", id)))?;

    let mut progress = start_day(ctx, day)?;
    progress.mark_complete(id, log)?;
    progress.save(&ctx.data.progress_path())?;

    println!("✓ Logged {} for {}", exercise.name, day);
    println!(
        "  {} of today's exercises done, average pain {:.1}",
        progress.completed_exercises.len(),
        progress.average_pain()
    );
    Ok(())
}

fn cmd_unlog(ctx: &Context, id: &str, date: Option<&str>) -> Result<()> {
    let day = resolve_day(date)?;
    let mut progress = start_day(ctx, day)?;

    if progress.unmark(id) {
        progress.save(&ctx.data.progress_path())?;
        println!("✓ Unmarked {}", id);
    } else {
        println!("{} was not marked complete", id);
    }
    Ok(())
}

fn cmd_history(ctx: &Context) -> Result<()> {
    start_day(ctx, Local::now().date_naive())?;
    let records = read_records(&ctx.data.history_path())?;

    if records.is_empty() {
        println!("No workouts recorded yet.");
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  phase {}  {} exercises  avg pain {:.1}",
            record.date,
            record.phase.number(),
            record.exercises.len(),
            history::average_pain(record)
        );
        for ex in &record.exercises {
            println!("    {} L{} R{} x{}", ex.name, ex.left, ex.right, ex.sets);
        }
    }
    Ok(())
}

fn cmd_export(
    ctx: &Context,
    file: Option<&Path>,
    weekly: Option<&Path>,
    monthly: Option<&Path>,
) -> Result<()> {
    if file.is_none() && weekly.is_none() && monthly.is_none() {
        return Err(Error::InvalidInput(
            "nothing to export; give a file, --weekly or --monthly".into(),
        ));
    }

    if let Some(file) = file {
        start_day(ctx, Local::now().date_naive())?;
        let records = read_records(&ctx.data.history_path())?;
        let rows = export_workouts_csv(&records, file)?;
        println!("✓ Exported {} rows to {}", rows, file.display());
    }
    if let Some(file) = weekly {
        let saved = assessments::read_weekly(&ctx.data.weekly_path())?;
        let rows = export_weekly_csv(&saved, file)?;
        println!("✓ Exported {} weekly assessments to {}", rows, file.display());
    }
    if let Some(file) = monthly {
        let saved = assessments::read_monthly(&ctx.data.monthly_path())?;
        let rows = export_monthly_csv(&saved, file)?;
        println!("✓ Exported {} monthly assessments to {}", rows, file.display());
    }
    Ok(())
}

fn show_value<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn cmd_assess(ctx: &Context, kind: AssessKind) -> Result<()> {
    match kind {
        AssessKind::Weekly {
            week,
            date,
            stand_left,
            stand_right,
            bridge_left,
            bridge_right,
            reach_left,
            reach_right,
            knee_pain,
            back_pain,
            foot_pain,
            notes,
        } => {
            let day = resolve_day(date.as_deref())?;
            let path = ctx.data.weekly_path();
            let earlier = assessments::read_weekly(&path)?;
            let week = match week {
                Some(week) => week,
                None => current_week(&read_records(&ctx.data.history_path())?, day),
            };

            let assessment = WeeklyAssessment {
                id: Uuid::new_v4(),
                week,
                date: day,
                stand_left,
                stand_right,
                bridge_left,
                bridge_right,
                reach_left,
                reach_right,
                knee_pain,
                back_pain,
                foot_pain,
                notes,
                recorded_at: Utc::now(),
            };
            assessments::save_weekly(&path, &assessment)?;
            println!("✓ Saved week {} assessment for {}", week, day);

            if let Some(prev) = assessments::previous(&earlier) {
                println!("  Previous (week {}, {}):", prev.week, prev.date);
                println!(
                    "    stand L {} R {}  bridge L {} R {}  reach L {} R {}",
                    show_value(prev.stand_left),
                    show_value(prev.stand_right),
                    show_value(prev.bridge_left),
                    show_value(prev.bridge_right),
                    show_value(prev.reach_left),
                    show_value(prev.reach_right)
                );
                println!(
                    "    pain knee {} back {} foot {}",
                    prev.knee_pain, prev.back_pain, prev.foot_pain
                );
            }
            Ok(())
        }
        AssessKind::Monthly {
            month,
            date,
            calf_right,
            calf_left,
            thigh_right,
            thigh_left,
            photos,
            video,
            ready,
            notes,
        } => {
            let day = resolve_day(date.as_deref())?;
            let month = match month {
                Some(month) => month,
                None => assessments::month_for_week(current_week(
                    &read_records(&ctx.data.history_path())?,
                    day,
                )),
            };

            let assessment = MonthlyAssessment {
                id: Uuid::new_v4(),
                month,
                date: day,
                calf_right,
                calf_left,
                thigh_right,
                thigh_left,
                photos_taken: photos,
                video_taken: video,
                phase: ctx.phase,
                ready_next_phase: ready,
                notes,
                recorded_at: Utc::now(),
            };
            assessments::save_monthly(&ctx.data.monthly_path(), &assessment)?;
            println!("✓ Saved month {} assessment for {}", month, day);
            Ok(())
        }
        AssessKind::Show => {
            let weekly = assessments::read_weekly(&ctx.data.weekly_path())?;
            let monthly = assessments::read_monthly(&ctx.data.monthly_path())?;
            if weekly.is_empty() && monthly.is_empty() {
                println!("No assessments recorded yet.");
                return Ok(());
            }

            for a in &weekly {
                println!(
                    "week {:<3} {}  stand L {} R {}  bridge L {} R {}  reach L {} R {}  pain {}/{}/{}",
                    a.week,
                    a.date,
                    show_value(a.stand_left),
                    show_value(a.stand_right),
                    show_value(a.bridge_left),
                    show_value(a.bridge_right),
                    show_value(a.reach_left),
                    show_value(a.reach_right),
                    a.knee_pain,
                    a.back_pain,
                    a.foot_pain
                );
            }
            for a in &monthly {
                println!(
                    "month {:<2} {}  calf R {} L {}  thigh R {} L {}  phase {}{}",
                    a.month,
                    a.date,
                    show_value(a.calf_right),
                    show_value(a.calf_left),
                    show_value(a.thigh_right),
                    show_value(a.thigh_left),
                    a.phase.number(),
                    if a.ready_next_phase { "  ready for next phase" } else { "" }
                );
            }
            Ok(())
        }
    }
}

fn cmd_stats(ctx: &Context, days: Option<u32>, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    start_day(ctx, today)?;
    let records = read_records(&ctx.data.history_path())?;
    let window = analytics::recent(&records, today, days);
    let summary = analytics::summarize(window, &ctx.catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.workouts == 0 {
        println!("No workouts recorded yet.");
        return Ok(());
    }

    println!("Workouts: {}", summary.workouts);
    println!("Completion rate: {}%", summary.completion_rate);
    println!("Target compliance: {}%", summary.target_compliance);
    println!("Pain-free sessions: {}%", summary.pain_free_rate);
    println!("Exercise variety: {}", summary.variety);
    if let Some(day) = summary.best_training_day {
        println!("Best training day: {}", day);
    }

    if !summary.volume_by_week.is_empty() {
        println!();
        println!("Volume by week");
        for week in &summary.volume_by_week {
            println!("  {}  {}", week.week_start, week.volume);
        }
    }

    if !summary.asymmetry.is_empty() {
        println!();
        println!(
            "Asymmetry ({} of {} improved)",
            summary.asymmetry_improvement.improved, summary.asymmetry_improvement.total
        );
        for a in &summary.asymmetry {
            println!("  {:<28} L {:<4} R {:<4} ratio {:.2}", a.name, a.left, a.right, a.ratio);
        }
    }

    if !summary.categories.is_empty() {
        println!();
        println!("Categories");
        for c in &summary.categories {
            println!("  {:<16} {:>3} ({}%)", c.category, c.count, c.percentage);
        }
    }
    Ok(())
}

fn cmd_validate(config: &Config) -> Result<()> {
    let catalog = match &config.catalog.path {
        Some(path) => Catalog::load_from(path)?,
        None => build_default_catalog(),
    };
    let schedules = match &config.schedule.path {
        Some(path) => ScheduleTable::load_from(path)?,
        None => build_default_schedule(),
    };

    let mut errors = catalog.validate();
    errors.extend(schedules.validate(&catalog));

    if !errors.is_empty() {
        eprintln!("Validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation(format!(
            "{} problems found",
            errors.len()
        )));
    }

    println!("✓ Catalog OK ({} exercises)", catalog.len());
    println!("✓ Schedule table OK");
    Ok(())
}
