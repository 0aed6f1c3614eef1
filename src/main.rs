use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use femhealth::ai::{GeminiClient, TextGenerator};
use femhealth::commands::{parse_date, today};
use femhealth::journal::{AppointmentDraft, MeasurementDraft, SymptomDraft};
use femhealth::models::{
    CycleConfig, CycleLog, CycleSymptom, FlowIntensity, Goal, GoalKind, Mood, Phase, PregnancyConfig,
};
use femhealth::storage::FileStore;
use femhealth::tips::{self, TipCategory};
use femhealth::{cycle, logging, pregnancy, prompts, AppState, Config};

#[derive(Debug, Parser)]
#[command(name = "femhealth")]
#[command(about = "Cycle, pregnancy and wellness tracking with optional AI insights")]
struct Cli {
    /// Path to a TOML config file (defaults to ./femhealth.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the phase of every day in the tracking window
    Cycle {
        #[arg(long, help = "First day of the last period (YYYY-MM-DD)")]
        start: String,
        #[arg(long)]
        length: Option<u32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(cycle::MAX_WINDOW_DAYS)))]
        days: Option<u32>,
    },
    /// Print a month calendar with cycle phases
    Calendar {
        #[arg(long)]
        start: String,
        #[arg(long)]
        length: Option<u32>,
        #[arg(long, help = "Month to show (YYYY-MM), defaults to the current month")]
        month: Option<String>,
    },
    /// Show the current pregnancy week and milestones
    Pregnancy {
        #[arg(long)]
        due: String,
        #[arg(long)]
        today: Option<String>,
        #[arg(long, help = "Also print frequently asked questions")]
        faq: bool,
    },
    /// Ask for an analysis of free-text symptoms
    Symptoms { text: String },
    /// Ask for insights on a mood entry
    Mood {
        #[arg(long, value_enum)]
        mood: Option<Mood>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Ask for personalised cycle insights
    Insights {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        length: Option<u32>,
        #[arg(long = "symptom", value_parser = parse_symptom, help = "name:severity, e.g. cramps:2")]
        symptoms: Vec<SymptomArg>,
        #[arg(long, value_enum)]
        mood: Option<Mood>,
        #[arg(long)]
        temperature: Option<f32>,
        #[arg(long, value_enum)]
        flow: Option<FlowIntensity>,
        #[arg(long = "medication")]
        medications: Vec<String>,
    },
    /// Ask what to expect in the current pregnancy week
    Weekly {
        #[arg(long)]
        due: String,
        #[arg(long)]
        today: Option<String>,
    },
    /// Encrypted pregnancy journal
    Journal {
        #[arg(long)]
        passphrase: String,
        #[command(subcommand)]
        action: JournalAction,
    },
    /// Wellness goals
    Goals {
        #[command(subcommand)]
        action: GoalAction,
    },
    /// Browse and bookmark health tips
    Tips {
        #[arg(long, value_enum)]
        category: Option<TipCategory>,
        #[arg(long, help = "Show the full text of one tip")]
        show: Option<u8>,
        #[arg(long, help = "Toggle the bookmark on a tip")]
        bookmark: Option<u8>,
        #[arg(long, help = "Only list bookmarked tips")]
        bookmarked: bool,
    },
    /// Show reminders, or change what gets shown
    Notify {
        #[arg(long, help = "First day of the last period (YYYY-MM-DD)")]
        start: Option<String>,
        #[arg(long)]
        length: Option<u32>,
        #[arg(long, help = "Unlock the journal to include appointments")]
        passphrase: Option<String>,
        #[command(subcommand)]
        action: Option<NotifyAction>,
    },
}

#[derive(Debug, Subcommand)]
enum NotifyAction {
    /// Print the current settings
    Settings,
    /// Turn a notification type on or off
    Set {
        #[arg(value_enum)]
        kind: NotifyToggle,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Configure quiet hours (HH:MM)
    Quiet {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        off: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NotifyToggle {
    Reminders,
    HealthTips,
    Appointments,
    Achievements,
}

#[derive(Debug, Subcommand)]
enum JournalAction {
    Init,
    Show,
    DueDate { date: String },
    AddAppointment {
        #[arg(long)]
        date: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    AddSymptom {
        #[arg(long)]
        date: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 1)]
        severity: u8,
        #[arg(long, default_value = "")]
        notes: String,
    },
    AddMeasurement {
        #[arg(long)]
        date: String,
        #[arg(long)]
        weight_kg: Option<f32>,
        #[arg(long)]
        blood_pressure: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    AddMood {
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_enum)]
        mood: Mood,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Remove {
        #[arg(value_enum)]
        kind: EntryKind,
        id: Uuid,
    },
    Export,
    Wipe {
        #[arg(long, help = "Confirm deletion of all local data")]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EntryKind {
    Appointment,
    Symptom,
    Measurement,
}

#[derive(Debug, Subcommand)]
enum GoalAction {
    List,
    Add {
        #[arg(long, value_enum, default_value = "custom")]
        kind: GoalKind,
        #[arg(long)]
        title: String,
        #[arg(long)]
        target: u32,
        #[arg(long)]
        unit: String,
    },
    Inc { id: Uuid },
    Dec { id: Uuid },
    Remove { id: Uuid },
}

#[derive(Debug, Clone)]
struct SymptomArg(CycleSymptom, u8);

fn parse_symptom(raw: &str) -> Result<SymptomArg, String> {
    let (name, severity) = raw.split_once(':').unwrap_or((raw, "1"));
    let symptom = CycleSymptom::from_str(name.trim(), true)?;
    let severity: u8 = severity
        .trim()
        .parse()
        .map_err(|_| format!("invalid severity in {raw:?}"))?;
    Ok(SymptomArg(symptom, severity.clamp(1, 3)))
}

fn date_or_today(input: Option<&str>) -> femhealth::Result<NaiveDate> {
    input.map(parse_date).unwrap_or_else(|| Ok(today()))
}

fn phase_marker(phase: Phase) -> char {
    match phase {
        Phase::Period => 'P',
        Phase::Fertile => 'F',
        Phase::Ovulation => 'O',
        Phase::Pms => 'S',
        Phase::Normal => ' ',
    }
}

fn open_state(config: &Config) -> anyhow::Result<AppState> {
    let dir = config.data_dir()?;
    tracing::debug!(dir = %dir.display(), "opening data store");
    let store = FileStore::open(&dir)?;
    Ok(AppState::new(Box::new(store), config.cycle))
}

async fn ask(config: &Config, prompt: String) -> anyhow::Result<()> {
    let client = GeminiClient::new(&config.ai)?;
    let answer = client.generate(&prompt).await?;
    println!("{answer}");
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Cycle { start, length, days } => {
            let start = parse_date(&start)?;
            let length = length.unwrap_or(config.cycle.default_length);
            let window = days.unwrap_or(config.cycle.window_days);
            for day in cycle::compute_cycle_days(CycleConfig::new(start, length), window) {
                println!("{}  {:>2}  {}", day.date, day.day_in_cycle, day.phase.label());
            }
        }
        Command::Calendar {
            start,
            length,
            month,
        } => {
            let start = parse_date(&start)?;
            let (year, month) = match month {
                Some(m) => {
                    let first = parse_date(&format!("{m}-01"))
                        .with_context(|| format!("invalid month {m:?}, expected YYYY-MM"))?;
                    (first.year(), first.month())
                }
                None => (today().year(), today().month()),
            };
            let length = length.unwrap_or(config.cycle.default_length);
            let days =
                cycle::compute_cycle_days(CycleConfig::new(start, length), config.cycle.window_days);
            let grid = cycle::month_grid(year, month, &days)?;

            println!("{year}-{month:02}");
            println!(" Sun Mon Tue Wed Thu Fri Sat");
            for week in &grid.weeks {
                let line: String = week
                    .iter()
                    .map(|cell| {
                        let marker = cell.cycle_day.map(|d| phase_marker(d.phase)).unwrap_or(' ');
                        if cell.in_month {
                            format!(" {:>2}{}", cell.date.day(), marker)
                        } else {
                            "    ".to_string()
                        }
                    })
                    .collect();
                println!("{line}");
            }
            println!("P period  F fertile  O ovulation  S pre-menstrual");
        }
        Command::Pregnancy { due, today, faq } => {
            let due = parse_date(&due)?;
            let today = date_or_today(today.as_deref())?;
            let status = pregnancy::status(PregnancyConfig { due_date: due }, today);

            println!("Week {} of 40 (trimester {})", status.week, status.trimester);
            println!("Progress: {:.0}%", status.progress_percent);
            println!("Estimated conception: {}", status.conception_date);
            for m in &status.milestones {
                let mark = if m.reached { "x" } else { " " };
                println!("  [{mark}] week {:>2}  {}", m.week, m.label);
            }
            if faq {
                for item in &pregnancy::FAQS {
                    println!("\nQ: {}\nA: {}", item.question, item.answer);
                }
            }
        }
        Command::Symptoms { text } => {
            ask(&config, prompts::symptom_analysis_prompt(&text)?).await?;
        }
        Command::Mood { mood, notes } => {
            ask(&config, prompts::mood_prompt(mood, &notes)?).await?;
        }
        Command::Insights {
            start,
            length,
            symptoms,
            mood,
            temperature,
            flow,
            medications,
        } => {
            let log = CycleLog {
                last_period: start.as_deref().map(parse_date).transpose()?,
                cycle_length_days: length.unwrap_or(config.cycle.default_length),
                symptoms: symptoms.into_iter().map(|s| (s.0, s.1)).collect(),
                mood,
                temperature,
                flow,
                medications,
            };
            ask(&config, prompts::cycle_insights_prompt(&log, today())?).await?;
        }
        Command::Weekly { due, today } => {
            let due = parse_date(&due)?;
            let today = date_or_today(today.as_deref())?;
            let week = pregnancy::compute_current_week(due, today);
            ask(&config, prompts::weekly_info_prompt(week)).await?;
        }
        Command::Journal { passphrase, action } => {
            let state = open_state(&config)?;
            run_journal(&state, passphrase, action)?;
        }
        Command::Goals { action } => {
            let state = open_state(&config)?;
            run_goals(&state, action)?;
        }
        Command::Tips {
            category,
            show,
            bookmark,
            bookmarked,
        } => {
            let state = open_state(&config)?;
            run_tips(&state, category, show, bookmark, bookmarked)?;
        }
        Command::Notify {
            start,
            length,
            passphrase,
            action,
        } => {
            let state = open_state(&config)?;
            match action {
                Some(action) => run_notify_settings(&state, action)?,
                None => {
                    if let Some(passphrase) = passphrase {
                        if !state.unlock(passphrase)? {
                            bail!("wrong passphrase");
                        }
                    }
                    let cycle_config = start
                        .as_deref()
                        .map(parse_date)
                        .transpose()?
                        .map(|s| state.cycle_config(s, length));
                    let pending = state.notifications(chrono::Local::now().naive_local(), cycle_config)?;
                    state.lock();
                    if pending.is_empty() {
                        println!("All caught up!");
                    }
                    for n in &pending {
                        println!("[{:?}] {}: {}", n.priority, n.title, n.message);
                    }
                }
            }
        }
    }

    Ok(())
}

fn run_journal(state: &AppState, passphrase: String, action: JournalAction) -> anyhow::Result<()> {
    if let JournalAction::Init = action {
        if state.is_setup()? {
            bail!("a journal already exists; use `journal wipe --yes` to start over");
        }
        state.setup(passphrase)?;
        println!("Journal created.");
        return Ok(());
    }
    if let JournalAction::Wipe { yes } = action {
        if !yes {
            bail!("refusing to wipe without --yes");
        }
        state.wipe_all_data()?;
        println!("All local data deleted.");
        return Ok(());
    }

    if !state.unlock(passphrase)? {
        bail!("wrong passphrase");
    }

    match action {
        JournalAction::Init | JournalAction::Wipe { .. } => {}
        JournalAction::Show => {
            let journal = state.journal()?;
            match journal.due_date {
                Some(due) => println!("Due date: {due} (week {})", journal.week_number),
                None => println!("Due date: not set"),
            }
            println!("Appointments:");
            for a in &journal.appointments {
                println!("  {}  {}  {}  {}", a.id, a.date, a.title, a.notes);
            }
            println!("Symptoms:");
            for s in &journal.symptoms {
                println!("  {}  {}  {} (severity {})  {}", s.id, s.date, s.name, s.severity, s.notes);
            }
            println!("Measurements:");
            for m in &journal.measurements {
                let weight = m.weight_kg.map(|w| format!("{w:.1} kg")).unwrap_or_default();
                let bp = m.blood_pressure.clone().unwrap_or_default();
                println!("  {}  {}  {weight}  {bp}  {}", m.id, m.date, m.notes);
            }
            println!("Moods:");
            for m in &journal.mood_entries {
                println!("  {}  {}  {} {}  {}", m.id, m.date, m.mood.emoji(), m.mood.label(), m.notes);
            }
        }
        JournalAction::DueDate { date } => {
            let status = state.set_due_date(parse_date(&date)?, today())?;
            println!("Due date saved, currently week {}.", status.week);
        }
        JournalAction::AddAppointment { date, title, notes } => {
            let id = state.add_appointment(AppointmentDraft {
                date: Some(parse_date(&date)?),
                title,
                notes,
            })?;
            println!("{id}");
        }
        JournalAction::AddSymptom {
            date,
            name,
            severity,
            notes,
        } => {
            let id = state.add_symptom(SymptomDraft {
                date: Some(parse_date(&date)?),
                name,
                severity,
                notes,
            })?;
            println!("{id}");
        }
        JournalAction::AddMeasurement {
            date,
            weight_kg,
            blood_pressure,
            notes,
        } => {
            let id = state.add_measurement(MeasurementDraft {
                date: Some(parse_date(&date)?),
                weight_kg,
                blood_pressure,
                notes,
            })?;
            println!("{id}");
        }
        JournalAction::AddMood { date, mood, notes } => {
            let id = state.add_mood(date_or_today(date.as_deref())?, mood, notes)?;
            println!("{id}");
        }
        JournalAction::Remove { kind, id } => {
            match kind {
                EntryKind::Appointment => state.remove_appointment(id)?,
                EntryKind::Symptom => state.remove_symptom(id)?,
                EntryKind::Measurement => state.remove_measurement(id)?,
            }
            println!("Removed {id}.");
        }
        JournalAction::Export => println!("{}", state.export_journal()?),
    }

    state.lock();
    Ok(())
}

fn run_goals(state: &AppState, action: GoalAction) -> anyhow::Result<()> {
    let print = |g: &Goal| {
        let done = if g.completed { " (done)" } else { "" };
        println!("{}  {}: {}/{} {}{}", g.id, g.title, g.current, g.target, g.unit, done);
    };

    match action {
        GoalAction::List => state.goals()?.goals.iter().for_each(print),
        GoalAction::Add {
            kind,
            title,
            target,
            unit,
        } => println!("{}", state.add_goal(kind, &title, target, &unit)?),
        GoalAction::Inc { id } => print(&state.increment_goal(id)?),
        GoalAction::Dec { id } => print(&state.decrement_goal(id)?),
        GoalAction::Remove { id } => {
            state.remove_goal(id)?;
            println!("Removed {id}.");
        }
    }
    Ok(())
}

fn run_tips(
    state: &AppState,
    category: Option<TipCategory>,
    show: Option<u8>,
    bookmark: Option<u8>,
    bookmarked: bool,
) -> anyhow::Result<()> {
    if let Some(id) = bookmark {
        let marked = state.toggle_bookmark(id)?;
        println!("Tip {id} {}.", if marked { "bookmarked" } else { "unbookmarked" });
        return Ok(());
    }
    if let Some(id) = show {
        let tip = tips::find(id).with_context(|| format!("no health tip with id {id}"))?;
        println!("{} ({}, {} min read)\nby {}\n", tip.title, tip.category.label(), tip.read_minutes, tip.author);
        println!("{}\n", tip.details);
        for item in tip.practical {
            println!("  - {item}");
        }
        for warning in tip.warnings {
            println!("  ! {warning}");
        }
        return Ok(());
    }

    let marks = state.bookmarks()?;
    for tip in tips::by_category(category) {
        let marked = marks.ids.contains(&tip.id);
        if bookmarked && !marked {
            continue;
        }
        let star = if marked { "*" } else { " " };
        println!("{star}{:>2}  [{}] {}\n     {}", tip.id, tip.category.label(), tip.title, tip.summary);
    }
    println!("\nTip of the day: {}", tips::TIP_OF_THE_DAY);
    Ok(())
}

fn parse_time(input: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .with_context(|| format!("invalid time {input:?}, expected HH:MM"))
}

fn run_notify_settings(state: &AppState, action: NotifyAction) -> anyhow::Result<()> {
    let mut settings = state.notification_settings()?;
    match action {
        NotifyAction::Settings => {}
        NotifyAction::Set { kind, enabled } => {
            let flag = match kind {
                NotifyToggle::Reminders => &mut settings.reminders,
                NotifyToggle::HealthTips => &mut settings.health_tips,
                NotifyToggle::Appointments => &mut settings.appointments,
                NotifyToggle::Achievements => &mut settings.achievements,
            };
            *flag = enabled;
        }
        NotifyAction::Quiet { from, to, off } => {
            let quiet = &mut settings.quiet_hours;
            quiet.enabled = !off;
            if let Some(from) = from {
                quiet.start = parse_time(&from)?;
            }
            if let Some(to) = to {
                quiet.end = parse_time(&to)?;
            }
        }
    }
    state.save_notification_settings(&settings)?;

    let on = |b: bool| if b { "on" } else { "off" };
    println!("reminders     {}", on(settings.reminders));
    println!("health tips   {}", on(settings.health_tips));
    println!("appointments  {}", on(settings.appointments));
    println!("achievements  {}", on(settings.achievements));
    let quiet = settings.quiet_hours;
    if quiet.enabled {
        println!("quiet hours   {} - {}", quiet.start.format("%H:%M"), quiet.end.format("%H:%M"));
    } else {
        println!("quiet hours   off");
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
